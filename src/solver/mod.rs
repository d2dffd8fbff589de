//! The CDCL engine (§1–§5): watched-literal propagation, 1-UIP conflict
//! analysis with non-chronological backjumping, the decision-heuristic
//! family, restart scheduling and learned-clause deletion, tied together by
//! the search driver's main loop (§4.7).
mod analyze;
mod clause;
mod data;
mod deletion;
mod heuristic;
mod log;
mod propagate;
mod restart;
mod trail;
mod watch;

pub use data::{Lit, Var};
pub use deletion::DeletionPolicy;
pub use heuristic::DecisionHeuristic;
pub use restart::RestartPolicy;

use analyze::AnalysisOutcome;
use clause::{ClauseDb, ClauseId};
use heuristic::Heuristic;
use propagate::PropagationResult;
use restart::RestartSchedule;
use tracing::debug;
use trail::{Trail, TrailReason};
use watch::WatchIndex;

/// Read-only counters exposed by §6.3. Placed on the solver instance rather
/// than threaded as process-wide globals the way the original source did
/// (§9 "Global counters").
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub decisions: u64,
    pub propagations: u64,
    pub checked_clauses: u64,
    pub conflicts: u64,
    pub restarts: u64,
}

/// A satisfying total assignment, borrowed from the solver's final trail.
pub struct Model<'a> {
    trail: &'a Trail,
}

impl<'a> Model<'a> {
    /// The truth value of DIMACS-style signed integer `l`'s variable.
    pub fn lit(&self, l: i32) -> bool {
        self.trail.is_lit_satisfied(Lit::new(l))
    }

    /// The full assignment as signed integers, one per variable, sorted by
    /// variable (§6.5: DIMACS output is "sorted by variable absolute value").
    pub fn as_vec(&self) -> Vec<i32> {
        (1..=self.trail.total_vars() as i32)
            .map(|v| if self.trail.is_lit_satisfied(Lit::new(v)) { v } else { -v })
            .collect()
    }
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Model").field(&self.as_vec()).finish()
    }
}

/// A proof of unsatisfiability is out of scope (§1 Non-goals: no proof
/// logging); this is a marker carrying no data.
#[derive(Debug)]
pub struct Proof;

#[derive(Debug)]
pub enum Result<'a> {
    Sat(Model<'a>),
    Unsat(Proof),
}

impl<'a> Result<'a> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Result::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Result::Unsat(_))
    }

    pub fn unwrap_sat(self) -> Model<'a> {
        match self {
            Result::Sat(model) => model,
            Result::Unsat(_) => panic!("Result is not SAT."),
        }
    }

    pub fn unwrap_unsat(self) -> Proof {
        match self {
            Result::Unsat(proof) => proof,
            Result::Sat(_) => panic!("Result is SAT."),
        }
    }
}

pub struct Solver {
    clause_db: ClauseDb,
    watches: WatchIndex,
    trail: Trail,
    /// Trail positions not yet scanned by [`Solver::propagate`]; plays the
    /// role of `spec.md`'s explicit `pending` set (§4.2, §9).
    unpropagated_pos: usize,

    heuristic: Heuristic,
    decision_heuristic: DecisionHeuristic,
    /// Re-supplied to a fresh [`Heuristic`] on every restart so assumptions
    /// are re-decided from scratch in the rebuilt search (§4.5).
    assumption_template: Vec<Lit>,

    deletion_policy: DeletionPolicy,
    restart_schedule: RestartSchedule,
    conflicts_since_restart: u64,

    /// The input formula contained an empty clause or two contradictory
    /// unit clauses; short-circuits [`Solver::solve`] (§7 "Invalid clause").
    trivially_unsat: bool,

    stats: Stats,

    /// Debug-only guard for the "solve() called twice" precondition (§7).
    solved: bool,
}

/// Fixed, never-exposed seed for the `random` heuristic and polarity choices
/// (§5: determinism depends on "any random seed used by the `random`
/// heuristic", never OS entropy). `new`'s signature (§6.3) takes no seed
/// parameter, so a constant stands in for one; see `DESIGN.md`.
const HEURISTIC_SEED: u64 = 0xD155_A7_5EED;

impl Solver {
    /// Build a solver over `clauses` (DIMACS-style signed-integer lists).
    /// `assumptions` are asserted as the first decisions (§1, §4.3); an
    /// empty slice disables assumption handling entirely.
    pub fn new<C, L, A>(
        clauses: C,
        restart_policy: RestartPolicy,
        deletion_policy: DeletionPolicy,
        decision_heuristic: DecisionHeuristic,
        assumptions: A,
    ) -> Self
    where
        C: IntoIterator<Item = L>,
        L: IntoIterator<Item = i32>,
        A: IntoIterator<Item = i32>,
    {
        let assumption_template: Vec<Lit> = assumptions.into_iter().map(Lit::new).collect();

        let mut solver = Self {
            clause_db: ClauseDb::new(),
            watches: WatchIndex::new(),
            trail: Trail::default(),
            unpropagated_pos: 0,
            heuristic: Heuristic::new(decision_heuristic, HEURISTIC_SEED),
            decision_heuristic,
            assumption_template: assumption_template.clone(),
            deletion_policy,
            restart_schedule: RestartSchedule::new(restart_policy),
            conflicts_since_restart: 0,
            trivially_unsat: false,
            stats: Stats::default(),
            solved: false,
        };

        for &lit in &assumption_template {
            solver.expand_for(lit.var());
        }

        let accepted: Vec<Vec<Lit>> = clauses
            .into_iter()
            .filter_map(|cls| {
                let mut cls: Vec<Lit> = cls.into_iter().map(Lit::new).collect();
                if Self::normalise_clause(&mut cls) {
                    None
                } else {
                    Some(cls)
                }
            })
            .collect();

        for cls in &accepted {
            for &lit in cls {
                solver.expand_for(lit.var());
            }
        }

        solver.heuristic.initialize(&accepted);
        solver.heuristic.set_assumptions(assumption_template);

        for cls in accepted {
            solver.insert_clause(cls, false, None);
        }

        solver
    }

    /// Convenience constructor reading a DIMACS CNF text body (§6.1), with
    /// no restarts, no deletion and `Vsids` decisions — a reasonable default
    /// for ad-hoc and test use; the CLI (§6.5) builds with user-chosen
    /// policies instead.
    pub fn from_dimacs(input: &str) -> std::result::Result<Self, crate::dimacs::DimacsError> {
        let clauses = crate::dimacs::parse(input)?;
        Ok(Self::new(
            clauses,
            RestartPolicy::None,
            DeletionPolicy::None,
            DecisionHeuristic::Vsids,
            Vec::new(),
        ))
    }

    fn expand_for(&mut self, var: Var) {
        self.trail.expand(var);
        self.watches.expand(-Lit::from(var), Vec::new());
    }

    /// Sort by variable and drop exact duplicates; report whether the
    /// clause is tautological (contains a variable and its negation), in
    /// which case the caller should drop the whole clause (§9 "Duplicate-
    /// literal clauses").
    fn normalise_clause(cls: &mut Vec<Lit>) -> bool {
        cls.sort_by_key(|lit| lit.var().get());
        cls.dedup();
        cls.windows(2).any(|w| w[0].var() == w[1].var())
    }

    /// Insert a single already-normalised clause, handling the empty/unit/
    /// general-length cases per §4.1.
    fn insert_clause(&mut self, cls: Vec<Lit>, learned: bool, lbd: Option<u32>) {
        match cls.len() {
            0 => self.trivially_unsat = true,
            1 => {
                if self.trail.is_lit_unsatisfied(cls[0]) {
                    self.trivially_unsat = true;
                } else if self.trail.is_lit_unassigned(cls[0]) {
                    self.trail.assign(cls[0], TrailReason::Axiom);
                }
            }
            _ => {
                let id = self.clause_db.insert_clause(&cls, learned, lbd);
                for &lit in &cls[0..2] {
                    self.watches[lit].push(id);
                }
            }
        }
    }

    /// Place the asserting literal and the literal with the next-highest
    /// decision level in the clause's two watch slots (§4.6 in effect: the
    /// asserting literal becomes satisfied the instant it is assigned, the
    /// second watch stays the sole remaining falsified literal until some
    /// future propagation pass moves it — standard CDCL practice, not a
    /// violation of the watch invariant's steady-state guarantee).
    fn add_learned_clause(&mut self, mut clause: Vec<Lit>, asserting_lit: Lit, lbd: u32) -> Option<ClauseId> {
        if clause.len() == 1 {
            debug_assert_eq!(clause[0], asserting_lit);
            return None;
        }

        let assert_pos = clause
            .iter()
            .position(|&l| l == asserting_lit)
            .expect("asserting literal missing from its own learned clause");
        clause.swap(0, assert_pos);

        let mut best_idx = 1;
        let mut best_level = self.trail.get_decision_level(clause[1]).unwrap_or(0);
        for i in 2..clause.len() {
            let lvl = self.trail.get_decision_level(clause[i]).unwrap_or(0);
            if lvl > best_level {
                best_level = lvl;
                best_idx = i;
            }
        }
        clause.swap(1, best_idx);

        let id = self.clause_db.insert_clause(&clause, true, Some(lbd));
        for &lit in &clause[0..2] {
            self.watches[lit].push(id);
        }
        Some(id)
    }

    /// Pop trail entries above `level`, then assert `asserting_lit` as the
    /// sole pending literal (§4.6). `reason` is the learned clause's id, or
    /// `None` for a unit learned clause asserted directly at level 0.
    fn backjump(&mut self, level: u32, asserting_lit: Lit, reason: Option<ClauseId>) {
        let new_len = self.trail.backtrack(level);
        self.unpropagated_pos = new_len;
        let reason = match reason {
            Some(cls) => TrailReason::Propagated { cls },
            None => TrailReason::Axiom,
        };
        self.trail.assign(asserting_lit, reason);
    }

    /// Rebuild the database via the deletion policy and reinitialize every
    /// piece of per-search state except the (trimmed) clause list and the
    /// restart/Luby counters (§4.5). Surviving clauses are re-inserted as
    /// non-learned, which is this implementation's way of marking them
    /// protected for every future restart — equivalent to resetting N₀ to
    /// the new database size (see `DESIGN.md`).
    fn restart(&mut self) {
        self.stats.restarts += 1;
        self.restart_schedule.on_restart();
        self.conflicts_since_restart = 0;

        let restart_number = self.restart_schedule.restart_number();
        let keep = deletion::keep_mask(self.deletion_policy, &self.clause_db, &self.trail, restart_number);

        let surviving: Vec<Vec<Lit>> = self
            .clause_db
            .iter_ids()
            .filter(|id| keep[id.get() as usize])
            .map(|id| self.clause_db.lits(id).to_vec())
            .collect();

        let unit_axioms: Vec<Lit> = self
            .trail
            .entries()
            .iter()
            .filter(|e| matches!(e.reason, TrailReason::Axiom))
            .map(|e| e.lit)
            .collect();

        let num_vars = self.trail.total_vars();

        self.clause_db = ClauseDb::new();
        self.watches = WatchIndex::new();
        self.trail = Trail::default();
        self.unpropagated_pos = 0;
        self.heuristic = Heuristic::new(self.decision_heuristic, HEURISTIC_SEED);
        self.heuristic.set_assumptions(self.assumption_template.clone());

        for idx in 1..=num_vars {
            self.expand_for(Var::from_index(idx as u32));
        }

        for lit in unit_axioms {
            if self.trail.is_lit_unassigned(lit) {
                self.trail.assign(lit, TrailReason::Axiom);
            }
        }

        self.heuristic.initialize(&surviving);
        for cls in surviving {
            self.insert_clause(cls, false, None);
        }

        debug!(restart_number, clauses = self.clause_db.len(), "restarted");
    }

    /// The main search loop (§4.7): propagate, then either resolve a
    /// conflict (learning a clause and backjumping, restarting, or
    /// declaring UNSAT) or make a new decision.
    pub fn solve(&mut self) -> Result {
        debug_assert!(!self.solved, "solve() must not be called twice on the same Solver (§7)");
        self.solved = true;

        if self.trivially_unsat {
            return Result::Unsat(Proof);
        }

        loop {
            self.log_state();

            match self.propagate() {
                PropagationResult::Conflict(conflict) => {
                    if self.trail.current_decision_level() == 0 {
                        debug!("conflict at decision level 0, UNSAT");
                        return Result::Unsat(Proof);
                    }

                    match self.analyze(conflict) {
                        AnalysisOutcome::Unsat => return Result::Unsat(Proof),
                        AnalysisOutcome::Restart => {
                            self.restart();
                            continue;
                        }
                        AnalysisOutcome::Learned { backjump_level, clause, asserting_lit, lbd } => {
                            self.heuristic.on_learned(&clause);
                            let reason = self.add_learned_clause(clause, asserting_lit, lbd);
                            self.backjump(backjump_level, asserting_lit, reason);
                            continue;
                        }
                    }
                }
                PropagationResult::Done => {}
            }

            if self.trail.assignment_complete() {
                let model = Model { trail: &self.trail };
                debug_assert!(self.check_assignment(), "generated assignment doesn't satisfy the input formula");
                return Result::Sat(model);
            }

            match self.heuristic.pick(&self.trail) {
                Some(lit) => {
                    self.stats.decisions += 1;
                    self.trail.new_decision_level();
                    self.trail.assign(lit, TrailReason::Decision);
                }
                None => unreachable!(
                    "heuristic found no unassigned literal although the assignment is incomplete"
                ),
            }
        }
    }

    fn check_assignment(&self) -> bool {
        self.clause_db.iter().all(|clause| self.trail.is_clause_satisfied(clause))
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The clauses this solver learned during its search, as signed-integer
    /// lists (§6.4: the backbone driver re-solves against "F ∪ learned").
    /// Unit clauses are never stored in the clause database (§4.1 inserts
    /// them straight onto the trail as axioms instead), so a unit learned
    /// clause cannot occur here by construction.
    pub fn learned_clauses(&self) -> Vec<Vec<i32>> {
        self.clause_db
            .iter_ids()
            .filter(|&id| self.clause_db.is_learned(id))
            .map(|id| self.clause_db.lits(id).iter().map(|lit| lit.get()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(cls: &[&[i32]]) -> Vec<Vec<i32>> {
        cls.iter().map(|c| c.to_vec()).collect()
    }

    #[test]
    fn trivial_unsat_on_empty_clause() {
        let mut solver = Solver::new(
            lits(&[&[1], &[]]),
            RestartPolicy::None,
            DeletionPolicy::None,
            DecisionHeuristic::Vsids,
            Vec::<i32>::new(),
        );
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn two_variable_unsat() {
        let mut solver = Solver::new(
            lits(&[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]),
            RestartPolicy::None,
            DeletionPolicy::None,
            DecisionHeuristic::Vsids,
            Vec::<i32>::new(),
        );
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn propagation_to_known_assignment() {
        let mut solver = Solver::new(
            lits(&[&[1, 2, 3], &[-1, 2], &[-2, 3], &[-3]]),
            RestartPolicy::None,
            DeletionPolicy::None,
            DecisionHeuristic::Vsids,
            Vec::<i32>::new(),
        );
        let model = solver.solve().unwrap_sat();
        assert_eq!(model.as_vec(), vec![-1, -2, 3]);
    }

    #[test]
    fn assumption_forces_first_decision() {
        let mut solver = Solver::new(
            lits(&[&[1, 2], &[-1, 2]]),
            RestartPolicy::None,
            DeletionPolicy::None,
            DecisionHeuristic::Vsids,
            vec![-1],
        );
        let model = solver.solve().unwrap_sat();
        assert!(!model.lit(1));
        assert!(model.lit(2));
    }

    #[test]
    fn restart_under_luby_still_finds_unsat() {
        let mut solver = Solver::new(
            lits(&[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]),
            RestartPolicy::Luby,
            DeletionPolicy::Lbd,
            DecisionHeuristic::Random,
            Vec::<i32>::new(),
        );
        assert!(solver.solve().is_unsat());
    }
}
