//! Abstract Syntax Tree (AST), obtained by parsing a call-site description.

use syn::punctuated::Punctuated;
use syn::Token;

use super::kw;

/// AST of a description file as a whole: one kernel call site, e.g.
/// `kernel testkern operates_on cell_column { [...] }`.
#[derive(Debug)]
pub struct ACallSite {
    pub kernel_kw: kw::kernel,
    pub name: AIdent,
    pub operates_kw: kw::operates_on,
    pub iterates: AIdent,
    pub body_brace: syn::token::Brace,
    pub items: Vec<AItem>,
}

/// AST of one item inside the call-site braces.
#[derive(Debug)]
pub enum AItem {
    /// AST of an argument entry, e.g. `field f2: real, read, w2;`.
    Arg(AArg),
    /// AST of, e.g., `basis w1, w3;`.
    Basis {
        kw: kw::basis,
        spaces: Punctuated<AIdent, Token![,]>,
        semi: Token![;],
    },
    /// AST of, e.g., `diff_basis w2;`.
    DiffBasis {
        kw: kw::diff_basis,
        spaces: Punctuated<AIdent, Token![,]>,
        semi: Token![;],
    },
    /// AST of, e.g., `quadrature xyoz;`.
    Quadrature {
        kw: kw::quadrature,
        shape: AIdent,
        semi: Token![;],
    },
    /// AST of, e.g., `evaluator on w0, w1;`.
    Evaluator {
        kw: kw::evaluator,
        on_kw: kw::on,
        targets: Punctuated<AIdent, Token![,]>,
        semi: Token![;],
    },
    /// AST of, e.g., `mesh adjacent_face;`.
    Mesh {
        kw: kw::mesh,
        properties: Punctuated<AIdent, Token![,]>,
        semi: Token![;],
    },
    /// AST of `coloured;`.
    Coloured { kw: kw::coloured, semi: Token![;] },
    /// AST of, e.g., `intergrid { coarse w2; fine w1; }`.
    Intergrid {
        kw: kw::intergrid,
        brace: syn::token::Brace,
        coarse_kw: kw::coarse,
        coarse: AIdent,
        coarse_semi: Token![;],
        fine_kw: kw::fine,
        fine: AIdent,
        fine_semi: Token![;],
    },
    /// AST of `boundary_condition field;` or `boundary_condition operator;`.
    BoundaryCondition {
        kw: kw::boundary_condition,
        target: AIdent,
        semi: Token![;],
    },
}

/// Category keyword of an argument entry.
#[derive(Debug)]
pub enum ACategory {
    Scalar(kw::scalar),
    Field(kw::field),
    FieldVector(kw::field_vector),
    Operator(kw::operator),
    CmaOperator(kw::cma_operator),
}

/// AST of one argument entry, e.g.
/// `field_vector chi(3): real, read, w0;`.
#[derive(Debug)]
pub struct AArg {
    pub category: ACategory,
    pub name: AArgName,
    pub vector_size: Option<AVectorSize>,
    pub colon: Token![:],
    pub kind: AIdent,
    pub kind_comma: Token![,],
    pub access: AIdent,
    pub extras: Vec<(Token![,], AExtra)>,
    pub semi: Token![;],
}

/// Name of an argument: a variable name, or a literal for a scalar
/// passed by value (e.g. `scalar 1.0_r_def: real, read;`).
#[derive(Debug)]
pub enum AArgName {
    Name(AIdent),
    Literal {
        minus: Option<Token![-]>,
        lit: syn::Lit,
    },
}

/// AST of, e.g., `(3)` after a field-vector name.
#[derive(Debug)]
pub struct AVectorSize {
    pub paren: syn::token::Paren,
    pub size: syn::LitInt,
}

/// Trailing attribute of an argument entry: a function space, a stencil,
/// or the mesh side of an inter-grid field.
#[derive(Debug)]
pub enum AExtra {
    Stencil {
        kw: kw::stencil,
        paren: syn::token::Paren,
        shape: AIdent,
        extent: Option<(Token![,], syn::LitInt)>,
    },
    Coarse(kw::coarse),
    Fine(kw::fine),
    Space(AIdent),
}

/// AST of an identifier: kernel names, variable names, function spaces.
#[derive(Debug)]
pub struct AIdent {
    pub token: proc_macro2::Ident,
}
