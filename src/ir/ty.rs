//! Data types attached to symbols and literals.

use std::rc::Rc;

use super::symbols::Symbol;

/// Intrinsic kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Real,
    Logical,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Real => "real",
            ScalarKind::Logical => "logical",
        }
    }
}

/// Type of a symbol.
///
/// User-defined types imported from other modules are not inspected by this
/// tool: they stay `Unresolved` and only their name travels into generated
/// code. `Unresolved` is an explicit state, never an implicit placeholder.
#[derive(Debug, Clone)]
pub enum DataType {
    Scalar(ScalarKind),
    Array { kind: ScalarKind, rank: usize },
    /// A variable whose type is the named user-defined type; `extent` is set
    /// for a 1D array of that type (e.g. a field-vector proxy).
    Named {
        type_symbol: Rc<Symbol>,
        extent: Option<u64>,
    },
    /// An imported user-defined type whose definition is not available.
    Unresolved,
    /// A module that symbols can be imported from.
    Container,
}
