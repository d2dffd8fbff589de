//! Small index wrappers so the rest of the solver never has to translate
//! [`Var`]/[`Lit`] to raw indices by hand.

mod litvec;
mod var;
mod varvec;

pub use litvec::LitVec;
pub use var::{Lit, Var};
pub use varvec::VarVec;
