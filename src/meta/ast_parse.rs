//! Parse an AST from a `syn::parse::ParseBuffer`.

use syn::parse::{Parse, ParseBuffer};
use syn::punctuated::Punctuated;
use syn::{Error, Token};

use super::ast::*;
use super::diagnostic::Diagnostic;
use super::kw;

pub fn parse_call_site(source: &str, dgns: &mut Vec<Diagnostic>) -> Result<ACallSite, ()> {
    match syn::parse_str(source) {
        Ok(site) => Ok(site),
        Err(error) => {
            dgns.push(Diagnostic::ParseError { error });
            Err(())
        }
    }
}

impl Parse for ACallSite {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let body_input;
        Ok(ACallSite {
            kernel_kw: input.parse()?,
            name: input.parse()?,
            operates_kw: input.parse()?,
            iterates: input.parse()?,
            body_brace: syn::braced!(body_input in input),
            items: {
                let mut items = vec![];
                while !body_input.is_empty() {
                    items.push(body_input.parse()?);
                }
                items
            },
        })
    }
}

impl Parse for AItem {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::scalar)
            || lookahead.peek(kw::field)
            || lookahead.peek(kw::field_vector)
            || lookahead.peek(kw::operator)
            || lookahead.peek(kw::cma_operator)
        {
            Ok(AItem::Arg(input.parse()?))
        } else if lookahead.peek(kw::basis) {
            Ok(AItem::Basis {
                kw: input.parse()?,
                spaces: Punctuated::parse_separated_nonempty(input)?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::diff_basis) {
            Ok(AItem::DiffBasis {
                kw: input.parse()?,
                spaces: Punctuated::parse_separated_nonempty(input)?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::quadrature) {
            Ok(AItem::Quadrature {
                kw: input.parse()?,
                shape: input.parse()?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::evaluator) {
            Ok(AItem::Evaluator {
                kw: input.parse()?,
                on_kw: input.parse()?,
                targets: Punctuated::parse_separated_nonempty(input)?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::mesh) {
            Ok(AItem::Mesh {
                kw: input.parse()?,
                properties: Punctuated::parse_separated_nonempty(input)?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::coloured) {
            Ok(AItem::Coloured {
                kw: input.parse()?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::intergrid) {
            let body_input;
            Ok(AItem::Intergrid {
                kw: input.parse()?,
                brace: syn::braced!(body_input in input),
                coarse_kw: body_input.parse()?,
                coarse: body_input.parse()?,
                coarse_semi: body_input.parse()?,
                fine_kw: body_input.parse()?,
                fine: body_input.parse()?,
                fine_semi: body_input.parse()?,
            })
        } else if lookahead.peek(kw::boundary_condition) {
            Ok(AItem::BoundaryCondition {
                kw: input.parse()?,
                target: input.parse()?,
                semi: input.parse()?,
            })
        } else {
            Err(lookahead.error())
        }
    }
}

impl Parse for ACategory {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let lookahead = input.lookahead1();
        Ok(if lookahead.peek(kw::scalar) {
            ACategory::Scalar(input.parse()?)
        } else if lookahead.peek(kw::field_vector) {
            ACategory::FieldVector(input.parse()?)
        } else if lookahead.peek(kw::field) {
            ACategory::Field(input.parse()?)
        } else if lookahead.peek(kw::operator) {
            ACategory::Operator(input.parse()?)
        } else if lookahead.peek(kw::cma_operator) {
            ACategory::CmaOperator(input.parse()?)
        } else {
            Err(lookahead.error())?
        })
    }
}

impl Parse for AArg {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let category = input.parse()?;
        let name = input.parse()?;
        let vector_size = if input.peek(syn::token::Paren) {
            let size_input;
            Some(AVectorSize {
                paren: syn::parenthesized!(size_input in input),
                size: size_input.parse()?,
            })
        } else {
            None
        };
        let colon = input.parse()?;
        let kind = input.parse()?;
        let kind_comma = input.parse()?;
        let access = input.parse()?;
        let mut extras = vec![];
        while input.peek(Token![,]) {
            extras.push((input.parse()?, input.parse()?));
        }
        Ok(AArg {
            category,
            name,
            vector_size,
            colon,
            kind,
            kind_comma,
            access,
            extras,
            semi: input.parse()?,
        })
    }
}

impl Parse for AArgName {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        if input.peek(Token![-]) || input.peek(syn::Lit) {
            Ok(AArgName::Literal {
                minus: if input.peek(Token![-]) {
                    Some(input.parse()?)
                } else {
                    None
                },
                lit: input.parse()?,
            })
        } else {
            Ok(AArgName::Name(input.parse()?))
        }
    }
}

impl Parse for AExtra {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::stencil) {
            let shape_input;
            let kw = input.parse()?;
            let paren = syn::parenthesized!(shape_input in input);
            let shape = shape_input.parse()?;
            let extent = if shape_input.peek(Token![,]) {
                Some((shape_input.parse()?, shape_input.parse()?))
            } else {
                None
            };
            Ok(AExtra::Stencil {
                kw,
                paren,
                shape,
                extent,
            })
        } else if lookahead.peek(kw::coarse) {
            Ok(AExtra::Coarse(input.parse()?))
        } else if lookahead.peek(kw::fine) {
            Ok(AExtra::Fine(input.parse()?))
        } else if lookahead.peek(syn::Ident) {
            Ok(AExtra::Space(input.parse()?))
        } else {
            Err(lookahead.error())
        }
    }
}

impl Parse for AIdent {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        // Parsing TokenTree instead of Ident to ignore Rust keywords
        let token_tree: proc_macro2::TokenTree = input.parse()?;
        match token_tree {
            proc_macro2::TokenTree::Ident(token) => Ok(AIdent { token }),
            _ => Err(Error::new(token_tree.span(), "expected identifier")),
        }
    }
}
