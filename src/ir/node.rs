//! Reference-tree nodes mirroring the generated argument list.
//!
//! Every argument appended to the flat list has exactly one node here. The
//! tree is self-contained: it can be rendered to Fortran source without
//! consulting any other representation.

use std::rc::Rc;

use super::symbols::Symbol;
use super::ty::ScalarKind;

#[derive(Debug, Clone)]
pub enum Node {
    /// Plain reference to a whole variable.
    Reference { symbol: Rc<Symbol> },
    /// Subscripted array access; `FullRange` stands for `:`.
    ArrayReference {
        symbol: Rc<Symbol>,
        indices: Vec<Node>,
    },
    /// Access to a member (chain) of a derived-type variable.
    StructureReference {
        symbol: Rc<Symbol>,
        members: Vec<String>,
    },
    /// Member access into one element of an array of derived types.
    ArrayOfStructuresReference {
        symbol: Rc<Symbol>,
        indices: Vec<Node>,
        members: Vec<String>,
    },
    Literal { text: String, kind: ScalarKind },
    FullRange,
}

impl Node {
    pub fn reference(symbol: &Rc<Symbol>) -> Node {
        Node::Reference {
            symbol: symbol.clone(),
        }
    }

    /// Renders the node as Fortran source.
    ///
    /// An array reference whose indices are all `:` denotes the whole array
    /// and is written without a subscript, matching how such arguments
    /// appear in the generated call.
    pub fn render(&self) -> String {
        match self {
            Node::Reference { symbol } => symbol.name.clone(),
            Node::ArrayReference { symbol, indices } => {
                if indices.iter().all(|i| matches!(i, Node::FullRange)) {
                    symbol.name.clone()
                } else {
                    format!("{}({})", symbol.name, render_indices(indices))
                }
            }
            Node::StructureReference { symbol, members } => {
                format!("{}%{}", symbol.name, members.join("%"))
            }
            Node::ArrayOfStructuresReference {
                symbol,
                indices,
                members,
            } => format!(
                "{}({})%{}",
                symbol.name,
                render_indices(indices),
                members.join("%")
            ),
            Node::Literal { text, .. } => text.clone(),
            Node::FullRange => ":".into(),
        }
    }
}

fn render_indices(indices: &[Node]) -> String {
    indices
        .iter()
        .map(Node::render)
        .collect::<Vec<_>>()
        .join(",")
}
