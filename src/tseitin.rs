//! A small propositional-formula front end (§6.2): reads the parenthesized
//! prefix grammar `(and|or <expr> <expr>)` / `(not <expr>)` / `<ident>`, and
//! emits a Tseitin CNF encoding. Grounded on
//! `original_source/formula2cnf.py`, reworked as an ordinary recursive-
//! descent parser over an explicit token stream instead of a generator
//! closed over mutable dictionary state.
use std::collections::HashMap;

use thiserror::Error;

use crate::solver::{Lit, Var};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TseitinError {
    #[error("unexpected end of input while reading a formula")]
    UnexpectedEof,
    #[error("'{0}' is not a valid variable name (must be alphanumeric, starting with a letter)")]
    InvalidIdentifier(String),
}

/// One node of the parsed expression tree. Leaves carry a [`Lit`] (so a
/// `not`-prefixed variable is folded into the leaf itself, as in the
/// source); internal nodes carry the operator and the Tseitin variable
/// assigned to stand for the subexpression rooted there.
enum Node {
    Leaf(Lit),
    And(Var, Box<Node>, Box<Node>),
    Or(Var, Box<Node>, Box<Node>),
}

impl Node {
    fn var(&self) -> Var {
        match self {
            Node::Leaf(lit) => lit.var(),
            Node::And(v, ..) | Node::Or(v, ..) => *v,
        }
    }

    fn lit(&self) -> Lit {
        match self {
            Node::Leaf(lit) => *lit,
            Node::And(v, ..) | Node::Or(v, ..) => Lit::from(*v),
        }
    }
}

/// Tracks the name -> variable-id mapping as new identifiers and auxiliary
/// Tseitin variables are minted, mirroring the source's shared `variables`
/// dict (§6.2).
#[derive(Default)]
pub struct VariableTable {
    ids: HashMap<String, Var>,
    names: Vec<(String, Var)>,
    next: u32,
}

impl VariableTable {
    fn fresh(&mut self) -> Var {
        self.next += 1;
        Var::from_index(self.next)
    }

    fn named(&mut self, name: &str) -> Result<Var, TseitinError> {
        if let Some(&var) = self.ids.get(name) {
            return Ok(var);
        }
        if !(name.chars().next().is_some_and(|c| c.is_alphabetic()) && name.chars().all(char::is_alphanumeric)) {
            return Err(TseitinError::InvalidIdentifier(name.to_string()));
        }
        let var = self.fresh();
        self.ids.insert(name.to_string(), var);
        self.names.push((name.to_string(), var));
        Ok(var)
    }

    /// The original-name -> variable mapping, in first-assigned order, for
    /// reporting back to the caller (§6.2, §6.5).
    pub fn named_variables(&self) -> &[(String, Var)] {
        &self.names
    }

    /// Total variables minted so far, named and auxiliary alike.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

/// Splits the parenthesized prefix grammar into a flat token stream,
/// treating `(` and `)` purely as whitespace (§6.2: the grammar carries no
/// arity ambiguity, so parens are redundant punctuation).
struct Tokenizer<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { tokens: input.split_whitespace() }
    }
}

// `split_whitespace` already skips the translated-to-space parens because
// callers pass a pre-translated string; see `tokenize` below.
fn tokenize(input: &str) -> Vec<String> {
    input.replace(['(', ')'], " ").split_whitespace().map(str::to_string).collect()
}

struct Parser<'a> {
    tokens: std::slice::Iter<'a, String>,
}

impl<'a> Parser<'a> {
    fn next_token(&mut self) -> Result<&'a str, TseitinError> {
        self.tokens.next().map(String::as_str).ok_or(TseitinError::UnexpectedEof)
    }

    fn parse(&mut self, vars: &mut VariableTable) -> Result<Node, TseitinError> {
        let token = self.next_token()?;
        match token {
            "not" => {
                let name = self.next_token()?;
                let var = vars.named(name)?;
                Ok(Node::Leaf(-Lit::from(var)))
            }
            "and" | "or" => {
                let var = vars.fresh();
                let left = self.parse(vars)?;
                let right = self.parse(vars)?;
                Ok(if token == "and" {
                    Node::And(var, Box::new(left), Box::new(right))
                } else {
                    Node::Or(var, Box::new(left), Box::new(right))
                })
            }
            ident => Ok(Node::Leaf(Lit::from(vars.named(ident)?))),
        }
    }
}

/// Parse a single formula from its textual prefix form.
pub fn parse(input: &str) -> Result<(Node, VariableTable), TseitinError> {
    let tokens = tokenize(input);
    let mut parser = Parser { tokens: tokens.iter() };
    let mut vars = VariableTable::default();
    let root = parser.parse(&mut vars)?;
    Ok((root, vars))
}

/// Walk the tree emitting Tseitin clauses (§6.2). `implications_only` drops
/// the right-to-left half of each biconditional, keeping only what is
/// needed to propagate the subexpression's truth upward.
fn extract_clauses(node: &Node, implications_only: bool, clauses: &mut Vec<Vec<Lit>>) {
    match node {
        Node::Leaf(_) => {}
        Node::Or(var, left, right) => {
            let (v, l, r) = (Lit::from(*var), left.lit(), right.lit());
            if l != -r {
                clauses.push(vec![-v, l, r]);
            }
            if !implications_only {
                clauses.push(vec![-l, v]);
                clauses.push(vec![-r, v]);
            }
            extract_clauses(left, implications_only, clauses);
            extract_clauses(right, implications_only, clauses);
        }
        Node::And(var, left, right) => {
            let (v, l, r) = (Lit::from(*var), left.lit(), right.lit());
            clauses.push(vec![-v, l]);
            clauses.push(vec![-v, r]);
            if !implications_only && l != -r {
                clauses.push(vec![-l, -r, v]);
            }
            extract_clauses(left, implications_only, clauses);
            extract_clauses(right, implications_only, clauses);
        }
    }
}

/// Parse and Tseitin-encode a whole formula, returning its CNF clauses (as
/// signed integers, ready for [`crate::solver::Solver::new`]) and the
/// original-name mapping.
///
/// Unlike `original_source/formula2cnf.py`, which emits only the
/// biconditional clauses and leaves the root unconstrained, this also
/// asserts the root node's variable true: without it the encoding merely
/// *describes* the formula's structure rather than *asserting* it, and an
/// all-false assignment would trivially satisfy every output (see
/// `DESIGN.md`).
pub fn encode(input: &str, implications_only: bool) -> Result<(Vec<Vec<i32>>, VariableTable), TseitinError> {
    let (root, vars) = parse(input)?;
    let mut clauses = Vec::new();
    extract_clauses(&root, implications_only, &mut clauses);
    clauses.push(vec![root.lit()]);

    let clauses = clauses.into_iter().map(|cls| cls.into_iter().map(Lit::get).collect()).collect();
    Ok((clauses, vars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_variable_formula_asserts_it_true() {
        let (clauses, vars) = encode("a", false).unwrap();
        assert_eq!(clauses, vec![vec![1]]);
        assert_eq!(vars.named_variables(), &[("a".to_string(), Var::new(1))]);
    }

    #[test]
    fn negated_variable_is_folded_into_the_leaf() {
        let (clauses, _vars) = encode("(not a)", false).unwrap();
        assert_eq!(clauses, vec![vec![-1]]);
    }

    #[test]
    fn and_of_two_variables_round_trips_to_sat() {
        let (clauses, vars) = encode("(and a b)", false).unwrap();
        // variable 1 is the `and` node itself, 2 and 3 are a and b.
        assert!(clauses.contains(&vec![-1, 2]));
        assert!(clauses.contains(&vec![-1, 3]));
        assert!(clauses.contains(&vec![-2, -3, 1]));
        assert!(clauses.contains(&vec![1]));

        let mut solver = crate::solver::Solver::new(
            clauses,
            crate::solver::RestartPolicy::None,
            crate::solver::DeletionPolicy::None,
            crate::solver::DecisionHeuristic::Vsids,
            Vec::<i32>::new(),
        );
        let model = solver.solve().unwrap_sat();
        assert!(model.lit(vars.ids[&"a".to_string()].get() as i32));
        assert!(model.lit(vars.ids[&"b".to_string()].get() as i32));
    }

    #[test]
    fn implications_only_drops_the_reverse_half() {
        let (clauses, _) = encode("(or a b)", true).unwrap();
        assert!(clauses.contains(&vec![-1, 2, 3]));
        assert!(!clauses.iter().any(|c| c == &vec![-2, 1]));
    }

    #[test]
    fn rejects_malformed_identifier() {
        let err = encode("(and 3x b)", false).unwrap_err();
        assert_eq!(err, TseitinError::InvalidIdentifier("3x".to_string()));
    }
}
