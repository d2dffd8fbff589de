//! The decision heuristic family (§4.3): `random`, `most_common`,
//! `Jeroslow-Wang` and a simplified `VSIDS`.
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{data::LitVec, trail::Trail, Lit};

/// Which scoring rule drives [`Heuristic::pick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionHeuristic {
    Random,
    MostCommon,
    JeroslowWang,
    Vsids,
}

impl std::str::FromStr for DecisionHeuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "most-common" | "most_common" => Ok(Self::MostCommon),
            "jeroslow-wang" | "jeroslow_wang" | "jw" => Ok(Self::JeroslowWang),
            "vsids" => Ok(Self::Vsids),
            other => Err(format!("unknown decision heuristic '{other}'")),
        }
    }
}

/// Per-literal scalar scores plus the fixed, first-encountered iteration
/// order the tie-break rules depend on (§3, §9).
pub(crate) struct Heuristic {
    variant: DecisionHeuristic,
    scores: LitVec<f64>,
    seen: LitVec<bool>,
    order: Vec<Lit>,
    rng: SmallRng,
    /// User-supplied assumption literals (§1, §4.3), popped LIFO by [`Self::pick`]
    /// before any score-based decision is considered.
    assumptions: Vec<Lit>,
}

impl Heuristic {
    pub fn new(variant: DecisionHeuristic, seed: u64) -> Self {
        Self {
            variant,
            scores: LitVec::new(),
            seen: LitVec::new(),
            order: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            assumptions: Vec::new(),
        }
    }

    /// Install the assumption stack. Later calls replace any earlier one
    /// (used by the driver to re-supply the original list across a restart).
    pub fn set_assumptions(&mut self, assumptions: Vec<Lit>) {
        self.assumptions = assumptions;
    }

    fn register(&mut self, lit: Lit) {
        self.scores.expand(lit, 0.0);
        self.seen.expand(lit, false);
        if !self.seen[lit] {
            self.seen[lit] = true;
            self.order.push(lit);
        }
    }

    fn bump_clause(&mut self, clause: &[Lit]) {
        match self.variant {
            DecisionHeuristic::Random => {}
            DecisionHeuristic::MostCommon | DecisionHeuristic::Vsids => {
                for &lit in clause {
                    self.scores[lit] += 1.0;
                }
            }
            DecisionHeuristic::JeroslowWang => {
                let weight = 2f64.powi(-(clause.len() as i32));
                for &lit in clause {
                    self.scores[lit] += weight;
                }
            }
        }
    }

    pub fn initialize(&mut self, clauses: &[Vec<Lit>]) {
        for clause in clauses {
            for &lit in clause {
                self.register(lit);
                self.register(-lit);
            }
            self.bump_clause(clause);
        }
    }

    pub fn on_learned(&mut self, clause: &[Lit]) {
        for &lit in clause {
            self.register(lit);
            self.register(-lit);
        }
        self.bump_clause(clause);

        if self.variant == DecisionHeuristic::Vsids {
            for score in self.scores.iter_mut() {
                *score *= 0.5;
            }
        }
    }

    pub fn pick(&mut self, trail: &Trail) -> Option<Lit> {
        if let Some(lit) = self.next_assumption(trail) {
            return Some(lit);
        }
        match self.variant {
            DecisionHeuristic::Random => self.pick_random(trail),
            _ => self.pick_scored(trail),
        }
    }

    /// Pop assumptions in LIFO order until one is still unassigned (§4.3).
    /// An assumption already forced true or false by propagation before its
    /// turn is simply dropped from the stack rather than re-decided or
    /// treated as a conflict — that is the driver's job once propagation
    /// actually contradicts it.
    fn next_assumption(&mut self, trail: &Trail) -> Option<Lit> {
        while let Some(lit) = self.assumptions.pop() {
            if trail.is_lit_unassigned(lit) {
                return Some(lit);
            }
        }
        None
    }

    fn pick_random(&mut self, trail: &Trail) -> Option<Lit> {
        let candidates: Vec<Lit> = self
            .order
            .iter()
            .copied()
            .filter(|&l| trail.is_lit_unassigned(l))
            .collect();

        if candidates.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..candidates.len());
        Some(candidates[idx])
    }

    /// §9 open question: `most_common`/`Jeroslow-Wang` break ties by keeping
    /// the *last*-encountered maximum (a `>=` comparison, the source's
    /// quirk); every other variant keeps the first-encountered maximum.
    fn pick_scored(&self, trail: &Trail) -> Option<Lit> {
        let mut best: Option<(Lit, f64)> = None;

        for &lit in &self.order {
            if !trail.is_lit_unassigned(lit) {
                continue;
            }
            let score = self.scores[lit];
            let take = match best {
                None => true,
                Some((_, best_score)) => match self.variant {
                    DecisionHeuristic::MostCommon | DecisionHeuristic::JeroslowWang => {
                        score >= best_score
                    }
                    _ => score > best_score,
                },
            };
            if take {
                best = Some((lit, score));
            }
        }

        best.map(|(lit, _)| lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|&i| Lit::new(i)).collect()
    }

    fn empty_trail(num_vars: i32) -> Trail {
        let mut trail = Trail::default();
        for v in 1..=num_vars {
            trail.expand(crate::solver::Var::new(v));
        }
        trail
    }

    #[test]
    fn most_common_scores_by_occurrence() {
        let mut h = Heuristic::new(DecisionHeuristic::MostCommon, 0);
        let clauses = vec![lits(&[1, 2]), lits(&[1, 3]), lits(&[1, -2])];
        h.initialize(&clauses);

        let trail = empty_trail(3);
        assert_eq!(h.pick(&trail), Some(Lit::new(1)));
    }

    #[test]
    fn jeroslow_wang_weighs_short_clauses_more() {
        let mut h = Heuristic::new(DecisionHeuristic::JeroslowWang, 0);
        let clauses = vec![lits(&[1]), lits(&[2, 3, 4, 5])];
        // A unit clause never reaches the heuristic in practice (it is
        // consumed as a forced axiom), but the scoring rule itself should
        // still favor the literal from the shorter clause.
        h.initialize(&clauses);

        let trail = empty_trail(5);
        assert_eq!(h.pick(&trail), Some(Lit::new(1)));
    }

    #[test]
    fn vsids_decays_on_every_learned_clause() {
        let mut h = Heuristic::new(DecisionHeuristic::Vsids, 0);
        h.initialize(&[lits(&[1, 2])]);
        h.on_learned(&lits(&[3, 4]));

        // literal 1's initial score of 1.0 has been halved once.
        assert!((h.scores[Lit::new(1)] - 0.5).abs() < 1e-9);
    }
}
