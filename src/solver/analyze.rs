//! 1-UIP conflict analysis and non-chronological backjumping (§4.4).
//!
//! Resolution loop over antecedents of falsified literals, restructured to
//! report an outcome instead of mutating the trail itself — backjumping and
//! assigning the asserting literal are the driver's job (§4.7), not the
//! analyzer's.
use tracing::debug;

use super::{
    clause::ClauseId,
    data::{Lit, VarVec},
    trail::Trail,
    Solver,
};

#[derive(Debug)]
pub(crate) enum AnalysisOutcome {
    /// The conflict clause was already unsatisfiable at decision level 0.
    Unsat,
    /// The conflict budget (§4.5) was exhausted before a clause could be derived.
    Restart,
    Learned {
        backjump_level: u32,
        clause: Vec<Lit>,
        asserting_lit: Lit,
        lbd: u32,
    },
}

#[derive(Default)]
struct AnalyzeState {
    seen: VarVec<bool>,
    new_clause: Vec<Lit>,
    /// Seen literals at the current decision level whose reason clause has
    /// not been resolved away yet.
    open: u32,
    levels_seen: Vec<bool>,
    levels_in_clause: Vec<u32>,
}

impl AnalyzeState {
    fn reset(&mut self, num_vars: usize, decision_levels: usize) {
        self.seen.fill(false);
        self.seen.resize(num_vars, false);
        self.new_clause.clear();
        self.levels_in_clause.clear();
        self.levels_seen.clear();
        self.levels_seen.resize(decision_levels + 1, false);
        self.open = 0;
    }

    fn analyze_reason(&mut self, pivot: Option<Lit>, reason: &[Lit], trail: &Trail) {
        for &other_lit in reason {
            if pivot == Some(other_lit) {
                continue;
            }
            self.analyze_literal(other_lit, trail);
        }
    }

    fn analyze_literal(&mut self, lit: Lit, trail: &Trail) {
        if self.has_seen_lit(lit) {
            return;
        }

        let lit_level = trail.get_decision_level(lit).unwrap();
        let current_level = trail.current_decision_level();

        debug_assert!(trail.is_lit_unsatisfied(lit));
        debug_assert!(lit_level <= current_level);

        if lit_level < current_level {
            self.new_clause.push(lit);
        } else {
            self.open += 1;
        }

        if !self.has_seen_level(lit_level) {
            self.levels_seen[lit_level as usize] = true;
            self.levels_in_clause.push(lit_level);
        }

        self.seen[lit.var()] = true;
    }

    fn has_seen_lit(&self, lit: Lit) -> bool {
        self.seen[lit.var()]
    }

    fn has_seen_level(&self, lvl: u32) -> bool {
        self.levels_seen[lvl as usize]
    }
}

impl Solver {
    /// Resolve the conflict clause back to its 1-UIP, consulting the conflict
    /// budget first so an exhausted budget short-circuits before any
    /// resolution work is wasted.
    pub(crate) fn analyze(&mut self, conflict: ClauseId) -> AnalysisOutcome {
        self.conflicts_since_restart += 1;
        if (self.conflicts_since_restart as f64) > self.restart_schedule.budget() {
            return AnalysisOutcome::Restart;
        }

        let current_level = self.trail.current_decision_level();
        if current_level == 0 {
            return AnalysisOutcome::Unsat;
        }

        debug_assert!(self
            .clause_db
            .lits(conflict)
            .iter()
            .all(|&lit| self.trail.is_lit_unsatisfied(lit)));

        let mut state = AnalyzeState::default();
        state.reset(self.trail.total_vars(), current_level as usize);

        let mut trail_pos = self.trail.assigned_vars();
        let mut reason: &[Lit] = self.clause_db.lits(conflict);
        let mut maybe_uip: Option<Lit> = None;

        let uip = loop {
            state.analyze_reason(maybe_uip, reason, &self.trail);

            let uip_candidate = loop {
                debug_assert!(trail_pos > 0);
                trail_pos -= 1;
                let lit = self.trail.get(trail_pos).unwrap().lit;
                if !state.has_seen_lit(lit) {
                    continue;
                }
                if self.trail.get_decision_level(lit).unwrap() == current_level {
                    break lit;
                }
            };
            maybe_uip = Some(uip_candidate);

            if state.open == 1 {
                break uip_candidate;
            }
            state.open -= 1;

            let reason_cls = self
                .trail
                .get_reason_cls(uip_candidate)
                .expect("a literal at the current level that is not yet the UIP was propagated");
            reason = self.clause_db.lits(reason_cls);
            debug!(open = state.open, "resolving against reason of {uip_candidate}");
        };

        state.new_clause.push(-uip);

        let backjump_level = state.new_clause[..state.new_clause.len() - 1]
            .iter()
            .map(|&lit| self.trail.get_decision_level(lit).unwrap())
            .max()
            .unwrap_or(0);

        let lbd = state.levels_in_clause.len() as u32;

        AnalysisOutcome::Learned {
            backjump_level,
            clause: state.new_clause,
            asserting_lit: -uip,
            lbd,
        }
    }
}
