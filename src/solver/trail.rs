//! The trail: an ordered log of assigned literals, each carrying a decision
//! level and an antecedent. Per-variable lookups (value, level, trail
//! position, antecedent) are O(1) side-table reads rather than linear scans
//! over the trail itself.
use super::{clause::ClauseId, data::VarVec, Lit, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrailReason {
    /// Chosen by the decision heuristic (or supplied as an assumption).
    Decision,
    /// Forced by `cls` becoming unit under the current trail.
    Propagated { cls: ClauseId },
    /// Forced by a unit clause present at construction time, at level 0.
    Axiom,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrailEntry {
    pub(crate) lit: Lit,
    pub(crate) reason: TrailReason,
}

#[derive(Clone, Copy)]
struct VarState {
    value: bool,
    level: u32,
    trail_pos: u32,
    antecedent: Option<ClauseId>,
}

#[derive(Default)]
pub(crate) struct Trail {
    entries: Vec<TrailEntry>,
    var_state: VarVec<Option<VarState>>,
    level: u32,
}

impl Trail {
    pub fn expand(&mut self, var: Var) {
        self.var_state.expand(var, None);
    }

    pub fn total_vars(&self) -> usize {
        self.var_state.len()
    }

    pub fn assigned_vars(&self) -> usize {
        self.entries.len()
    }

    pub fn assignment_complete(&self) -> bool {
        self.entries.len() == self.var_state.len()
    }

    pub fn current_decision_level(&self) -> u32 {
        self.level
    }

    /// Start a new decision level; call before `assign` for the decision literal.
    pub fn new_decision_level(&mut self) {
        self.level += 1;
    }

    pub fn get(&self, idx: usize) -> Option<&TrailEntry> {
        self.entries.get(idx)
    }

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    fn state(&self, lit: Lit) -> Option<VarState> {
        self.var_state[lit.var()]
    }

    pub fn is_lit_assigned(&self, lit: Lit) -> bool {
        self.state(lit).is_some()
    }

    pub fn is_lit_unassigned(&self, lit: Lit) -> bool {
        self.state(lit).is_none()
    }

    pub fn is_lit_satisfied(&self, lit: Lit) -> bool {
        matches!(self.state(lit), Some(s) if s.value == lit.is_pos())
    }

    pub fn is_lit_unsatisfied(&self, lit: Lit) -> bool {
        matches!(self.state(lit), Some(s) if s.value != lit.is_pos())
    }

    pub fn value(&self, lit: Lit) -> Option<bool> {
        self.state(lit).map(|s| s.value == lit.is_pos())
    }

    pub fn get_decision_level(&self, lit: Lit) -> Option<u32> {
        self.state(lit).map(|s| s.level)
    }

    pub fn trail_pos(&self, lit: Lit) -> Option<u32> {
        self.state(lit).map(|s| s.trail_pos)
    }

    pub fn get_reason_cls(&self, lit: Lit) -> Option<ClauseId> {
        self.state(lit).and_then(|s| s.antecedent)
    }

    pub fn assign(&mut self, lit: Lit, reason: TrailReason) {
        debug_assert!(self.is_lit_unassigned(lit));

        let level = match reason {
            TrailReason::Axiom => 0,
            TrailReason::Decision | TrailReason::Propagated { .. } => self.level,
        };
        let antecedent = match reason {
            TrailReason::Propagated { cls } => Some(cls),
            TrailReason::Decision | TrailReason::Axiom => None,
        };

        let trail_pos = self.entries.len() as u32;
        self.entries.push(TrailEntry { lit, reason });

        self.var_state[lit.var()] = Some(VarState {
            value: lit.is_pos(),
            level,
            trail_pos,
            antecedent,
        });
    }

    /// Pop every entry with a decision level above `target_level`; returns the
    /// trail length the propagator should resume scanning from. Watches are
    /// left untouched — they stay valid under two-watched-literal semantics.
    pub fn backtrack(&mut self, target_level: u32) -> usize {
        while let Some(entry) = self.entries.last() {
            if self.var_state[entry.lit.var()]
                .map(|s| s.level)
                .unwrap_or(0)
                <= target_level
            {
                break;
            }
            let lit = entry.lit;
            self.entries.pop();
            self.var_state[lit.var()] = None;
        }
        self.level = target_level;
        self.entries.len()
    }

    pub fn is_clause_satisfied(&self, clause: &[Lit]) -> bool {
        clause.iter().any(|&lit| self.is_lit_satisfied(lit))
    }
}
