//! Clause deletion policies (§4.6), applied to every unprotected clause —
//! originals and any clause surviving an earlier restart are protected and
//! never considered here.
use super::{clause::ClauseDb, trail::TrailReason, Trail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    None,
    Short,
    Lbd,
    Active,
}

impl std::str::FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "short" => Ok(Self::Short),
            "lbd" => Ok(Self::Lbd),
            "active" => Ok(Self::Active),
            other => Err(format!("unknown deletion policy '{other}'")),
        }
    }
}

/// How many currently-live trail entries cite each clause as their
/// antecedent. Indexed by `ClauseId::get()`; almost always 0 or 1 in
/// practice, but nothing prevents a clause from forcing more than one
/// variable across its lifetime on the trail.
fn antecedent_use_counts(db: &ClauseDb, trail: &Trail) -> Vec<u32> {
    let mut counts = vec![0u32; db.len()];
    for entry in trail.entries() {
        if let TrailReason::Propagated { cls } = entry.reason {
            counts[cls.get() as usize] += 1;
        }
    }
    counts
}

/// Decide, for every clause in `db`, whether it survives this deletion pass.
/// Evaluated against the trail *before* the restart reinitializes it — a
/// clause's LBD and antecedent usage are properties of the search state that
/// produced it, not of the fresh state about to replace it.
pub(crate) fn keep_mask(
    policy: DeletionPolicy,
    db: &ClauseDb,
    trail: &Trail,
    restart_number: u64,
) -> Vec<bool> {
    let r = restart_number.max(1) as f64;
    let short_threshold = r.log2() + 1.0;
    let active_threshold = r.log10() - 1.0;
    let active_counts = if policy == DeletionPolicy::Active {
        antecedent_use_counts(db, trail)
    } else {
        Vec::new()
    };

    db.iter_ids()
        .map(|id| {
            if db.is_protected(id) {
                return true;
            }
            match policy {
                DeletionPolicy::None => true,
                DeletionPolicy::Short => (db.len_of(id) as f64) <= short_threshold,
                DeletionPolicy::Lbd => {
                    let levels: std::collections::HashSet<u32> = db
                        .lits(id)
                        .iter()
                        .filter(|&&lit| trail.is_lit_unsatisfied(lit))
                        .filter_map(|&lit| trail.get_decision_level(lit))
                        .collect();
                    (levels.len() as f64) <= short_threshold
                }
                DeletionPolicy::Active => {
                    let count = active_counts[id.get() as usize];
                    count > 0 && (count as f64) >= active_threshold
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{data::Lit, Var};

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|&i| Lit::new(i)).collect()
    }

    #[test]
    fn protected_clauses_always_survive() {
        let mut db = ClauseDb::new();
        let id = db.insert_clause(&lits(&[1, -2, 3]), false, None);
        let trail = Trail::default();
        let mask = keep_mask(DeletionPolicy::Short, &db, &trail, 1);
        assert!(mask[id.get() as usize]);
    }

    #[test]
    fn short_policy_drops_long_learned_clauses() {
        let mut db = ClauseDb::new();
        let short = db.insert_clause(&lits(&[1, 2]), true, Some(2));
        let long = db.insert_clause(&lits(&[1, 2, 3, 4, 5, 6]), true, Some(6));
        let trail = Trail::default();

        // restart 1: threshold = log2(1) + 1 = 1, so nothing this short
        // survives either, but the six-literal clause is further from it.
        let mask = keep_mask(DeletionPolicy::Short, &db, &trail, 4);
        // threshold = log2(4) + 1 = 3
        assert!(mask[short.get() as usize]);
        assert!(!mask[long.get() as usize]);
    }

    #[test]
    fn active_policy_keeps_clauses_in_use() {
        let mut db = ClauseDb::new();
        let used = db.insert_clause(&lits(&[1, -2, 3]), true, None);
        let unused = db.insert_clause(&lits(&[4, -5, 6]), true, None);

        let mut trail = Trail::default();
        for v in 1..=6 {
            trail.expand(Var::new(v));
        }
        trail.assign(Lit::new(-1), TrailReason::Decision);
        trail.assign(Lit::new(3), TrailReason::Propagated { cls: used });

        // restart_number = 10 gives threshold log10(10) - 1 = 0.
        let mask = keep_mask(DeletionPolicy::Active, &db, &trail, 10);
        assert!(mask[used.get() as usize]);
        assert!(!mask[unused.get() as usize]);
    }
}
