//! End-to-end scenarios (§8), built against `Solver::new` directly rather
//! than fixture files on disk, since none shipped with the source material.
use dissat::{DecisionHeuristic, DeletionPolicy, RestartPolicy, Solver};

/// `None` for UNSAT, `Some(assignment)` for SAT — sidesteps `Model`'s
/// borrow of its solver so callers don't need to keep the solver alive.
fn solve(clauses: Vec<Vec<i32>>, restart: RestartPolicy, deletion: DeletionPolicy) -> Option<Vec<i32>> {
    let mut solver = Solver::new(clauses, restart, deletion, DecisionHeuristic::Vsids, Vec::<i32>::new());
    match solver.solve() {
        dissat::Result::Unsat(_) => None,
        dissat::Result::Sat(model) => Some(model.as_vec()),
    }
}

#[test]
fn two_variable_contradiction_is_unsat() {
    let clauses = vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]];
    assert!(solve(clauses, RestartPolicy::None, DeletionPolicy::None).is_none());
}

#[test]
fn three_variable_formula_has_the_expected_unique_model() {
    let clauses = vec![vec![1, 2, 3], vec![-1, 2], vec![-2, 3], vec![-3]];
    let assignment = solve(clauses, RestartPolicy::None, DeletionPolicy::None).unwrap();
    assert_eq!(assignment, vec![-1, -2, 3]);
}

/// Pigeonhole PHP(3,2): 3 pigeons into 2 holes, UNSAT by the pigeonhole
/// principle. Variable `v(pigeon, hole) = (pigeon - 1) * 2 + hole`.
fn php_3_2() -> Vec<Vec<i32>> {
    let v = |pigeon: i32, hole: i32| (pigeon - 1) * 2 + hole;
    let mut clauses = Vec::new();

    for pigeon in 1..=3 {
        clauses.push(vec![v(pigeon, 1), v(pigeon, 2)]);
    }
    for hole in 1..=2 {
        for p1 in 1..=3 {
            for p2 in (p1 + 1)..=3 {
                clauses.push(vec![-v(p1, hole), -v(p2, hole)]);
            }
        }
    }
    clauses
}

#[test]
fn pigeonhole_three_into_two_is_unsat() {
    assert!(solve(php_3_2(), RestartPolicy::None, DeletionPolicy::None).is_none());
}

/// A small deterministic 3-SAT instance at the classic hard-region ratio
/// (20 variables, 60 clauses, ratio 3.0), generated by a fixed linear
/// congruential sequence rather than `rand` so the instance itself needs no
/// external seed plumbing. Its actual satisfiability is irrelevant to this
/// test: by soundness and completeness, any two correct restart policies
/// must agree on it (§8 scenario 4).
fn random_3sat_20_vars() -> Vec<Vec<i32>> {
    let mut state: u64 = 0x5EED_1234;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    (0..60)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let var = (next() % 20) as i32 + 1;
                    if next() % 2 == 0 {
                        var
                    } else {
                        -var
                    }
                })
                .collect()
        })
        .collect()
}

#[test]
fn random_instance_agrees_across_restart_policies() {
    let clauses = random_3sat_20_vars();
    let luby = solve(clauses.clone(), RestartPolicy::Luby, DeletionPolicy::Lbd);
    let geometric = solve(clauses, RestartPolicy::Geometric, DeletionPolicy::Short);
    assert_eq!(luby.is_some(), geometric.is_some());
}

#[test]
fn backbone_driver_finds_the_forced_literal() {
    // `(1)` forces variable 1 true; `(1 v 2)` adds nothing once 1 is already
    // true, and `(-2 v 3)` leaves both 2 and 3 free whenever 2 is false, so
    // variable 1 is this formula's only backbone literal.
    let clauses = vec![vec![1], vec![1, 2], vec![-2, 3]];
    let result = dissat::backbone::backbones(clauses);
    assert_eq!(result.backbones, vec![dissat::Lit::new(1)]);
}

#[test]
fn tseitin_of_and_with_nested_or_forces_both_variables_true() {
    let (clauses, vars) = dissat::tseitin::encode("(and a (or b (not a)))", false).unwrap();
    let mut solver = Solver::new(
        clauses,
        RestartPolicy::None,
        DeletionPolicy::None,
        DecisionHeuristic::Vsids,
        Vec::<i32>::new(),
    );
    let model = solver.solve().unwrap_sat();

    let named: std::collections::HashMap<&str, dissat::Var> =
        vars.named_variables().iter().map(|(name, v)| (name.as_str(), *v)).collect();

    assert!(model.lit(named["a"].get() as i32));
    assert!(model.lit(named["b"].get() as i32));
}
