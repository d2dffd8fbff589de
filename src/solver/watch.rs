//! The watch index: the total mapping from every literal to the set of
//! clauses currently watching it (§3, §4.1).
use super::clause::ClauseId;
use super::data::LitVec;

/// `Lit -> {ClauseId}`, represented as `Lit -> Vec<ClauseId>` since watch
/// lists are small and scanned sequentially during propagation anyway.
pub(crate) type WatchIndex = LitVec<Vec<ClauseId>>;
