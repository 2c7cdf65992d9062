//! Parsing of Fortran literal text into typed literal nodes.
//!
//! Literal scalar arguments arrive from the algorithm layer as source text
//! (e.g. `1.0_r_def`, `.true.`). The text is kept verbatim for rendering;
//! parsing only validates it and determines the scalar kind.

use std::fmt;

use num_traits::cast;

use super::node::Node;
use super::ty::ScalarKind;

#[derive(Debug)]
pub struct LiteralError {
    pub text: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}` is not a valid literal constant", self.text)
    }
}

/// Parses `text` as a literal of the given kind.
pub fn parse_literal(text: &str, kind: ScalarKind) -> Result<Node, LiteralError> {
    let err = || LiteralError { text: text.into() };
    let ok = match kind {
        ScalarKind::Logical => {
            let lower = text.to_ascii_lowercase();
            lower == ".true." || lower == ".false."
        }
        ScalarKind::Integer => parse_integer(strip_kind_suffix(text)).is_some(),
        ScalarKind::Real => parse_real(strip_kind_suffix(text)),
    };
    if ok {
        Ok(Node::Literal {
            text: text.into(),
            kind,
        })
    } else {
        Err(err())
    }
}

/// Removes a trailing `_kind` suffix (e.g. `_r_def`), if present.
fn strip_kind_suffix(text: &str) -> &str {
    match text.find('_') {
        Some(pos) if pos > 0 => &text[..pos],
        _ => text,
    }
}

fn parse_integer(digits: &str) -> Option<i32> {
    // Values must fit the default integer kind.
    let value: i64 = digits.parse().ok()?;
    cast::<i64, i32>(value)
}

fn parse_real(text: &str) -> bool {
    // Fortran also writes exponents with `d`; normalize before parsing.
    let normalized = text.replace(&['d', 'D'][..], "e");
    normalized.parse::<f64>().is_ok() && text.contains(|c: char| !c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_literals() {
        assert!(parse_literal("1.0_r_def", ScalarKind::Real).is_ok());
        assert!(parse_literal("2.5d0", ScalarKind::Real).is_ok());
        assert!(parse_literal("42", ScalarKind::Integer).is_ok());
        assert!(parse_literal("-7_i_def", ScalarKind::Integer).is_ok());
        assert!(parse_literal(".TRUE.", ScalarKind::Logical).is_ok());
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(parse_literal("f1", ScalarKind::Real).is_err());
        assert!(parse_literal("1.0.0", ScalarKind::Real).is_err());
        assert!(parse_literal("true", ScalarKind::Logical).is_err());
        // Out of range for the default integer kind.
        assert!(parse_literal("4294967296", ScalarKind::Integer).is_err());
    }

    #[test]
    fn keeps_source_text_verbatim() {
        match parse_literal("1.0_r_def", ScalarKind::Real).unwrap() {
            Node::Literal { text, kind } => {
                assert_eq!(text, "1.0_r_def");
                assert_eq!(kind, ScalarKind::Real);
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }
}
