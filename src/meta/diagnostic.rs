//! User-facing diagnostics of the description frontend.

use proc_macro2::{Ident, Span};

use super::sess::Sess;

#[derive(Debug)]
pub enum Diagnostic {
    ParseError {
        error: syn::parse::Error,
    },
    UnknownIterationSpace {
        ident: Ident,
    },
    UnknownScalarKind {
        ident: Ident,
    },
    UnknownAccess {
        ident: Ident,
    },
    UnknownStencilShape {
        ident: Ident,
    },
    UnknownMeshProperty {
        ident: Ident,
    },
    UnknownBoundaryTarget {
        ident: Ident,
    },
    UnsupportedLiteral {
        span: Span,
    },
    /// A literal used where only a variable name makes sense.
    LiteralOutsideScalar {
        span: Span,
    },
    LiteralScalarNotRead {
        access: Ident,
    },
    VectorSizeMissing {
        name_span: Span,
    },
    VectorSizeTooSmall {
        size: syn::LitInt,
    },
    VectorSizeNotAllowed {
        size: syn::LitInt,
    },
    AlreadyDefinedArg {
        old: Ident,
        new: Ident,
    },
    WrongSpaceCount {
        category: &'static str,
        expected: usize,
        found: usize,
        span: Span,
    },
    /// A `coarse`/`fine` marker on a field of a kernel with no
    /// `intergrid` block.
    MeshSideOutsideIntergrid {
        span: Span,
    },
    /// A field of an inter-grid kernel with no `coarse`/`fine` marker.
    IntergridFieldWithoutSide {
        ident: Ident,
    },
    /// An inter-grid kernel with no field on one of its two meshes.
    IntergridSideMissing {
        side: &'static str,
        span: Span,
    },
}

impl Diagnostic {
    pub fn diagnostic_message(&self, sess: &Sess) -> String {
        match self {
            Diagnostic::ParseError { error } => sess.error(
                &error.to_string(),
                vec![sess.error_ann("here", error.span())],
            ),
            Diagnostic::UnknownIterationSpace { ident } => sess.error(
                &format!(
                    "unknown iteration space `{}`, expected `cell_column`, `domain` or `dof`",
                    ident
                ),
                vec![sess.error_ann("unknown iteration space", ident.span())],
            ),
            Diagnostic::UnknownScalarKind { ident } => sess.error(
                &format!(
                    "unknown scalar kind `{}`, expected `real`, `integer` or `logical`",
                    ident
                ),
                vec![sess.error_ann("unknown scalar kind", ident.span())],
            ),
            Diagnostic::UnknownAccess { ident } => sess.error(
                &format!(
                    "unknown access `{}`, expected `read`, `write`, `readwrite` or `inc`",
                    ident
                ),
                vec![sess.error_ann("unknown access", ident.span())],
            ),
            Diagnostic::UnknownStencilShape { ident } => sess.error(
                &format!("unknown stencil shape `{}`", ident),
                vec![sess.error_ann("unknown stencil shape", ident.span())],
            ),
            Diagnostic::UnknownMeshProperty { ident } => sess.error(
                &format!("unknown mesh property `{}`", ident),
                vec![sess.error_ann("unknown mesh property", ident.span())],
            ),
            Diagnostic::UnknownBoundaryTarget { ident } => sess.error(
                &format!(
                    "unknown boundary-condition target `{}`, expected `field` or `operator`",
                    ident
                ),
                vec![sess.error_ann("unknown target", ident.span())],
            ),
            Diagnostic::UnsupportedLiteral { span } => sess.error(
                "only integer, real and logical literals are allowed here",
                vec![sess.error_ann("unsupported literal", *span)],
            ),
            Diagnostic::LiteralOutsideScalar { span } => sess.error(
                "only scalar arguments can be passed as literals",
                vec![sess.error_ann("must be a variable name", *span)],
            ),
            Diagnostic::LiteralScalarNotRead { access } => sess.error(
                "a literal scalar argument must have `read` access",
                vec![sess.error_ann("must be `read`", access.span())],
            ),
            Diagnostic::VectorSizeMissing { name_span } => sess.error(
                "a field vector needs a size, e.g. `field_vector chi(3)`",
                vec![sess.error_ann("missing vector size", *name_span)],
            ),
            Diagnostic::VectorSizeTooSmall { size } => sess.error(
                "a field vector must have at least two components",
                vec![sess.error_ann("must be at least 2", size.span())],
            ),
            Diagnostic::VectorSizeNotAllowed { size } => sess.error(
                "only a field vector takes a size",
                vec![sess.error_ann("size not allowed here", size.span())],
            ),
            Diagnostic::AlreadyDefinedArg { old, new } => sess.error(
                &format!("argument `{}` already defined", new),
                vec![
                    sess.error_ann("cannot re-use an argument name", new.span()),
                    sess.help_ann("was defined here", old.span()),
                ],
            ),
            Diagnostic::WrongSpaceCount {
                category,
                expected,
                found,
                span,
            } => sess.error(
                &format!(
                    "a {} argument takes {} function space(s), got {}",
                    category, expected, found
                ),
                vec![sess.error_ann("wrong number of function spaces", *span)],
            ),
            Diagnostic::MeshSideOutsideIntergrid { span } => sess.error(
                "`coarse`/`fine` markers need an `intergrid` block",
                vec![sess.error_ann("kernel has no `intergrid` block", *span)],
            ),
            Diagnostic::IntergridFieldWithoutSide { ident } => sess.error(
                &format!(
                    "field `{}` of an inter-grid kernel must be marked `coarse` or `fine`",
                    ident
                ),
                vec![sess.error_ann("missing `coarse` or `fine`", ident.span())],
            ),
            Diagnostic::IntergridSideMissing { side, span } => sess.error(
                &format!("an inter-grid kernel needs a field on the {} mesh", side),
                vec![sess.error_ann("no field on this mesh", *span)],
            ),
        }
    }
}
