pub mod backbone;
pub mod dimacs;
pub mod solver;
pub mod tseitin;
mod util;

pub use solver::{
    DecisionHeuristic, DeletionPolicy, Lit, Model, Proof, RestartPolicy, Result, Solver, Stats, Var,
};
