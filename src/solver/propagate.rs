//! Unit propagation via the two-watched-literal scheme (§4.2).
use super::{clause::ClauseId, trail::TrailReason, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropagationResult {
    Conflict(ClauseId),
    Done,
}

impl Solver {
    /// Propagate every trail entry not yet scanned, stopping at the first
    /// conflict. Entries already on the trail but unscanned play the role of
    /// `spec.md`'s explicit `pending` set; a decision or a backjump simply
    /// leaves `unpropagated_pos` behind the newly pushed literal.
    pub(crate) fn propagate(&mut self) -> PropagationResult {
        while self.unpropagated_pos < self.trail.assigned_vars() {
            let lit = self.trail.get(self.unpropagated_pos).unwrap().lit;
            self.unpropagated_pos += 1;
            debug_assert!(self.trail.is_lit_satisfied(lit));

            let falsified = -lit;
            let (watch_list, mut rest) = self.watches.remaining(falsified);

            let mut idx = 0;
            let mut conflict = None;
            while idx < watch_list.len() {
                let cid = watch_list[idx];
                self.stats.checked_clauses += 1;
                debug_assert!(self.clause_db.len_of(cid) >= 2);

                let [w0, w1] = self.clause_db.watches(cid);
                debug_assert!(w0 == falsified || w1 == falsified);
                let other = if w0 == falsified { w1 } else { w0 };

                let replacement = self
                    .clause_db
                    .lits(cid)
                    .iter()
                    .copied()
                    .find(|&l| l != w0 && l != w1 && !self.trail.is_lit_unsatisfied(l));

                match replacement {
                    Some(new_watch) => {
                        self.clause_db.replace_watch(cid, falsified, new_watch);
                        rest[new_watch].push(cid);
                        watch_list.swap_remove(idx);
                    }
                    None if self.trail.is_lit_unassigned(other) => {
                        self.stats.propagations += 1;
                        self.trail
                            .assign(other, TrailReason::Propagated { cls: cid });
                        idx += 1;
                    }
                    None if self.trail.is_lit_unsatisfied(other) => {
                        conflict = Some(cid);
                        break;
                    }
                    None => idx += 1, // `other` is already satisfied; nothing to do.
                }
            }

            if let Some(cid) = conflict {
                self.stats.conflicts += 1;
                return PropagationResult::Conflict(cid);
            }
        }

        PropagationResult::Done
    }
}
