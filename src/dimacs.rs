//! DIMACS CNF text format parsing (§6.1). A complete crate around the core
//! needs a way to actually get a formula in, the way `varisat-dimacs` sits
//! alongside `varisat` itself; this module plays that role here.
use thiserror::Error;

/// Everything that can go wrong while reading a DIMACS CNF body (§7 "Invalid
/// clause" / malformed input), grounded on `varisat-dimacs`'s `ParserError`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimacsError {
    #[error("line {line}: expected a 'p cnf <vars> <clauses>' header before any clause data")]
    MissingHeader { line: usize },
    #[error("line {line}: malformed header '{text}'")]
    InvalidHeader { line: usize, text: String },
    #[error("line {line}: '{token}' is not a valid literal")]
    InvalidLiteral { line: usize, token: String },
    #[error("clause on line {line} is not terminated by a trailing 0")]
    UnterminatedClause { line: usize },
    #[error("empty clause terminated on line {line}")]
    EmptyClause { line: usize },
}

/// Parse a DIMACS CNF document into its list of clauses, each a list of
/// signed-integer literals with the trailing `0` terminator stripped.
///
/// Lines starting with `c` are comments; the `p cnf <vars> <clauses>` header
/// is recognized but not otherwise enforced (`spec.md` §6.1: the counts are
/// advisory, not load-bearing, for this solver).
pub fn parse(input: &str) -> Result<Vec<Vec<i32>>, DimacsError> {
    let mut clauses = Vec::new();
    let mut current: Vec<i32> = Vec::new();
    let mut terminated = true;
    let mut seen_header = false;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('p') {
            let mut tokens = rest.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some("cnf"), Some(_), Some(_)) => {
                    seen_header = true;
                    continue;
                }
                _ => {
                    return Err(DimacsError::InvalidHeader { line: line_no, text: line.to_string() })
                }
            }
        }

        if !seen_header {
            return Err(DimacsError::MissingHeader { line: line_no });
        }

        for token in line.split_whitespace() {
            let value: i32 = token
                .parse()
                .map_err(|_| DimacsError::InvalidLiteral { line: line_no, token: token.to_string() })?;

            if value == 0 {
                if current.is_empty() {
                    return Err(DimacsError::EmptyClause { line: line_no });
                }
                clauses.push(std::mem::take(&mut current));
                terminated = true;
            } else {
                current.push(value);
                terminated = false;
            }
        }
    }

    if !terminated {
        return Err(DimacsError::UnterminatedClause { line: input.lines().count() });
    }

    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comments_header_and_clauses() {
        let dimacs = "\
            c a tiny instance\n\
            p cnf 3 3\n\
            1 -2 -3 0\n\
            2 3 1 0\n\
            1 0\n\
            2 0\n\
        ";

        let result = parse(dimacs).unwrap();
        assert_eq!(result[0], vec![1, -2, -3]);
        assert_eq!(result[1], vec![2, 3, 1]);
        assert_eq!(result[2], vec![1]);
        assert_eq!(result[3], vec![2]);
    }

    #[test]
    fn rejects_clause_data_before_header() {
        let dimacs = "1 -2 0\n";
        assert_eq!(parse(dimacs), Err(DimacsError::MissingHeader { line: 1 }));
    }

    #[test]
    fn rejects_garbage_header() {
        let dimacs = "p not-a-header\n";
        assert_eq!(
            parse(dimacs),
            Err(DimacsError::InvalidHeader { line: 1, text: "p not-a-header".to_string() })
        );
    }

    #[test]
    fn rejects_non_integer_literal() {
        let dimacs = "p cnf 2 1\nfoo 0\n";
        assert_eq!(
            parse(dimacs),
            Err(DimacsError::InvalidLiteral { line: 2, token: "foo".to_string() })
        );
    }

    #[test]
    fn rejects_missing_terminator() {
        let dimacs = "p cnf 2 1\n1 -2\n";
        assert_eq!(parse(dimacs), Err(DimacsError::UnterminatedClause { line: 2 }));
    }

    #[test]
    fn rejects_empty_clause() {
        let dimacs = "p cnf 1 1\n0\n";
        assert_eq!(parse(dimacs), Err(DimacsError::EmptyClause { line: 2 }));
    }
}
