//! `tracing`-based debug output: per-step clause/trail dumps and an
//! implication-graph dot export, grounded on the teacher's own ANSI-colored
//! `print_state` and dot-export helpers, adapted to the rewritten
//! [`Trail`]/[`ClauseDb`] APIs.
use tracing::{debug, instrument};

use super::{
    clause::ClauseId,
    trail::{Trail, TrailReason},
    Lit, Solver,
};

const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const END: &str = "\u{1b}[0m";

#[allow(dead_code)]
impl Solver {
    #[instrument(skip_all)]
    pub(crate) fn log_state(&self) {
        if !tracing::event_enabled!(tracing::Level::DEBUG) {
            return;
        }
        for cls in self.clause_db.iter() {
            debug!("{}", self.trail.fmt_clause(cls));
        }
        debug!(trail = %self.trail.fmt_trail());
    }

    /// Render the current implication graph, plus the conflicting clause if
    /// any, as a Graphviz `dot` digraph. Not part of the core per se (§1),
    /// kept as a debugging aid the way the teacher kept its ANSI dump.
    pub(crate) fn implication_graph_to_dot(
        &self,
        conflict: Option<ClauseId>,
        mut out: impl std::io::Write,
    ) -> std::io::Result<()> {
        writeln!(out, "digraph {{")?;
        for entry in self.trail.entries() {
            let annotation = match entry.reason {
                TrailReason::Decision => "D",
                TrailReason::Propagated { .. } => "P",
                TrailReason::Axiom => "A",
            };
            writeln!(out, "{} [label = \"{}{annotation}\"];", entry.lit.var(), entry.lit)?;

            if let TrailReason::Propagated { cls } = entry.reason {
                for &l in self.clause_db.lits(cls) {
                    if l == entry.lit {
                        continue;
                    }
                    writeln!(out, "{} -> {};", l.var(), entry.lit.var())?;
                }
            }
        }

        if let Some(conflict) = conflict {
            writeln!(out, "X;")?;
            for &l in self.clause_db.lits(conflict) {
                writeln!(out, "{} -> X;", l.var())?;
            }
        }

        writeln!(out, "}}")
    }
}

impl Trail {
    pub(crate) fn fmt_lit(&self, lit: Lit) -> String {
        match self.value(lit) {
            Some(true) => format!("{GREEN}{}{END}", lit.get()),
            Some(false) => format!("{RED}{}{END}", lit.get()),
            None => format!("{}", lit.get()),
        }
    }

    pub(crate) fn fmt_clause(&self, clause: &[Lit]) -> String {
        clause
            .iter()
            .map(|&lit| self.fmt_lit(lit))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn fmt_trail(&self) -> String {
        let entries: Vec<String> = self
            .entries()
            .iter()
            .map(|entry| {
                let lit = entry.lit;
                match entry.reason {
                    TrailReason::Decision => format!("{lit}D"),
                    TrailReason::Propagated { .. } => format!("{lit}P"),
                    TrailReason::Axiom => format!("{lit}A"),
                }
            })
            .collect();
        format!("[{}]", entries.join(", "))
    }
}
