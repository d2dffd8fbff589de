//! Backbone literal extraction (§6.4): the literals that hold in *every*
//! satisfying assignment of a formula. Grounded on
//! `original_source/backbones.py`'s repeated-solve algorithm, carried over
//! almost verbatim since it is already phrased as a sequence of independent
//! solver runs rather than anything internal to one search.
use crate::solver::{DecisionHeuristic, DeletionPolicy, Lit, RestartPolicy, Solver};

/// The result of a backbone extraction run: the backbone literals
/// themselves, plus how many [`Solver`] instances it took to find them
/// (§6.4's reported "number of solver runs").
#[derive(Debug, Clone)]
pub struct BackboneResult {
    pub backbones: Vec<Lit>,
    pub solver_runs: u32,
}

/// Find every backbone literal of `clauses`.
///
/// Solves once to obtain a candidate model (its literals are the only
/// literals that can possibly be a backbone), then repeatedly re-solves
/// `F ∪ learned + [[-literal]]` for each remaining candidate, where `learned`
/// accumulates every clause learned by every prior run in this call (§6.4):
/// if that is UNSAT, `literal` is a backbone; if it is SAT, the new model's
/// literals are intersected into the candidate set, shrinking it, and its
/// own learned clauses are folded into `learned` for the next iteration.
/// Matches `original_source/backbones.py`'s fixed `Luby` / `active` /
/// `Jeroslow-Wang` policy choice for every run, including the first.
pub fn backbones<C, L>(clauses: C) -> BackboneResult
where
    C: IntoIterator<Item = L>,
    L: IntoIterator<Item = i32>,
{
    let original_clauses: Vec<Vec<i32>> =
        clauses.into_iter().map(|cls| cls.into_iter().collect()).collect();

    let mut learned: Vec<Vec<i32>> = Vec::new();

    let mut solver_runs = 1;
    let mut solver = new_solver(original_clauses.clone(), &[]);

    let mut possible_backbones: Vec<Lit> = match solver.solve() {
        crate::solver::Result::Unsat(_) => Vec::new(),
        crate::solver::Result::Sat(model) => model.as_vec().into_iter().map(Lit::new).collect(),
    };
    learned.extend(solver.learned_clauses());

    let mut backbones: Vec<Lit> = Vec::new();

    while let Some(literal) = possible_backbones.pop() {
        solver_runs += 1;

        let mut clauses = original_clauses.clone();
        clauses.extend(learned.iter().cloned());
        clauses.push(vec![-literal.get()]);

        let mut solver = new_solver(clauses, &[]);
        match solver.solve() {
            crate::solver::Result::Sat(model) => {
                let fresh: Vec<Lit> = model.as_vec().into_iter().map(Lit::new).collect();
                possible_backbones.retain(|lit| fresh.contains(lit) && !backbones.contains(lit));
            }
            crate::solver::Result::Unsat(_) => {
                backbones.push(literal);
            }
        }
        learned.extend(solver.learned_clauses());
    }

    BackboneResult { backbones, solver_runs }
}

fn new_solver(clauses: Vec<Vec<i32>>, assumptions: &[i32]) -> Solver {
    Solver::new(
        clauses,
        RestartPolicy::Luby,
        DeletionPolicy::Active,
        DecisionHeuristic::JeroslowWang,
        assumptions.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_literal_is_the_sole_backbone() {
        // (1) forces variable 1 true; 2 can go either way.
        let clauses = vec![vec![1], vec![-1, 2, 3], vec![-1, -2, -3]];
        let result = backbones(clauses);
        assert_eq!(result.backbones, vec![Lit::new(1)]);
    }

    #[test]
    fn unsat_formula_has_no_backbones() {
        let clauses = vec![vec![1], vec![-1]];
        let result = backbones(clauses);
        assert!(result.backbones.is_empty());
    }

    #[test]
    fn fully_free_variable_has_no_backbone() {
        let clauses = vec![vec![1, 2], vec![-1, 2]];
        let result = backbones(clauses);
        // 2 is forced true by the two clauses; 1 is free.
        assert_eq!(result.backbones, vec![Lit::new(2)]);
    }
}
