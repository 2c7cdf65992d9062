//! Compiles the parsed description into the typed call-site model.
//!
//! Compilation keeps going after an error so one run reports as many
//! diagnostics as possible; the result is discarded when any were pushed.

use std::rc::Rc;

use proc_macro2::Span;

use crate::access::AccessKind;
use crate::ir::ty::ScalarKind;
use crate::kern::{
    ArgCategory, BoundaryKind, FunctionSpace, Intergrid, IterationSpace, KernelArg, KernelCall,
    MeshProperty, MeshSide, QrRule, QuadratureShape, Stencil, StencilShape,
};

use super::ast::*;
use super::diagnostic::Diagnostic;

pub fn compile_call_site(
    ast: &ACallSite,
    dgns: &mut Vec<Diagnostic>,
) -> Result<Rc<KernelCall>, ()> {
    let before = dgns.len();

    let iterates_over = match ast.iterates.token.to_string().as_str() {
        "cell_column" => IterationSpace::CellColumn,
        "domain" => IterationSpace::Domain,
        "dof" => IterationSpace::Dof,
        _ => {
            dgns.push(Diagnostic::UnknownIterationSpace {
                ident: ast.iterates.token.clone(),
            });
            IterationSpace::CellColumn
        }
    };

    let has_intergrid = ast
        .items
        .iter()
        .any(|item| matches!(item, AItem::Intergrid { .. }));

    let mut call = KernelCall {
        name: ast.name.token.to_string(),
        iterates_over,
        coloured: false,
        args: vec![],
        basis_spaces: vec![],
        diff_basis_spaces: vec![],
        qr_rules: vec![],
        eval_targets: vec![],
        mesh_properties: vec![],
        boundary_condition: None,
        intergrid: None,
    };

    let mut seen: Vec<proc_macro2::Ident> = vec![];
    let mut intergrid_span: Option<Span> = None;

    for item in &ast.items {
        match item {
            AItem::Arg(arg) => {
                if let Some(karg) = compile_arg(arg, has_intergrid, &mut seen, dgns) {
                    call.args.push(karg);
                }
            }
            AItem::Basis { spaces, .. } => {
                call.basis_spaces.extend(spaces.iter().map(space_of));
            }
            AItem::DiffBasis { spaces, .. } => {
                call.diff_basis_spaces.extend(spaces.iter().map(space_of));
            }
            AItem::Quadrature { shape, .. } => {
                let shape = match shape.token.to_string().as_str() {
                    "xyoz" => QuadratureShape::Xyoz,
                    "face" => QuadratureShape::Face,
                    "edge" => QuadratureShape::Edge,
                    // Carried through for the orderer to reject.
                    other => QuadratureShape::Other(other.into()),
                };
                call.qr_rules.push(QrRule::new(shape));
            }
            AItem::Evaluator { targets, .. } => {
                call.eval_targets.extend(targets.iter().map(space_of));
            }
            AItem::Mesh { properties, .. } => {
                for property in properties {
                    match property.token.to_string().as_str() {
                        "adjacent_face" => call.mesh_properties.push(MeshProperty::AdjacentFace),
                        _ => dgns.push(Diagnostic::UnknownMeshProperty {
                            ident: property.token.clone(),
                        }),
                    }
                }
            }
            AItem::Coloured { .. } => call.coloured = true,
            AItem::Intergrid {
                kw, coarse, fine, ..
            } => {
                call.intergrid = Some(Intergrid {
                    coarse: space_of(coarse),
                    fine: space_of(fine),
                });
                intergrid_span = Some(kw.span);
            }
            AItem::BoundaryCondition { target, .. } => {
                call.boundary_condition = match target.token.to_string().as_str() {
                    "field" => Some(BoundaryKind::Field),
                    "operator" => Some(BoundaryKind::Operator),
                    _ => {
                        dgns.push(Diagnostic::UnknownBoundaryTarget {
                            ident: target.token.clone(),
                        });
                        None
                    }
                };
            }
        }
    }

    if let Some(span) = intergrid_span {
        for &(side, want) in &[("coarse", MeshSide::Coarse), ("fine", MeshSide::Fine)] {
            if !call.args.iter().any(|a| a.mesh() == Some(want)) {
                dgns.push(Diagnostic::IntergridSideMissing { side, span });
            }
        }
    }

    if dgns.len() > before {
        Err(())
    } else {
        Ok(Rc::new(call))
    }
}

fn space_of(ident: &AIdent) -> FunctionSpace {
    FunctionSpace::new(&ident.token.to_string())
}

fn compile_arg(
    arg: &AArg,
    has_intergrid: bool,
    seen: &mut Vec<proc_macro2::Ident>,
    dgns: &mut Vec<Diagnostic>,
) -> Option<KernelArg> {
    let name_span = match &arg.name {
        AArgName::Name(ident) => ident.token.span(),
        AArgName::Literal { lit, .. } => lit.span(),
    };

    let (name, literal) = match &arg.name {
        AArgName::Name(ident) => {
            if let Some(old) = seen.iter().find(|old| **old == ident.token) {
                dgns.push(Diagnostic::AlreadyDefinedArg {
                    old: old.clone(),
                    new: ident.token.clone(),
                });
            } else {
                seen.push(ident.token.clone());
            }
            (ident.token.to_string(), false)
        }
        AArgName::Literal { minus, lit } => {
            if !matches!(arg.category, ACategory::Scalar(_)) {
                dgns.push(Diagnostic::LiteralOutsideScalar { span: lit.span() });
            }
            let text = match lit {
                syn::Lit::Int(lit) => lit.to_string(),
                syn::Lit::Float(lit) => lit.to_string(),
                syn::Lit::Bool(lit) => if lit.value { ".true." } else { ".false." }.to_string(),
                other => {
                    dgns.push(Diagnostic::UnsupportedLiteral { span: other.span() });
                    return None;
                }
            };
            let text = if minus.is_some() {
                format!("-{}", text)
            } else {
                text
            };
            (text, true)
        }
    };

    let kind = match arg.kind.token.to_string().as_str() {
        "real" => ScalarKind::Real,
        "integer" => ScalarKind::Integer,
        "logical" => ScalarKind::Logical,
        _ => {
            dgns.push(Diagnostic::UnknownScalarKind {
                ident: arg.kind.token.clone(),
            });
            ScalarKind::Real
        }
    };

    let access = match arg.access.token.to_string().as_str() {
        "read" => AccessKind::Read,
        "write" => AccessKind::Write,
        "readwrite" => AccessKind::ReadWrite,
        "inc" => AccessKind::Inc,
        _ => {
            dgns.push(Diagnostic::UnknownAccess {
                ident: arg.access.token.clone(),
            });
            AccessKind::Read
        }
    };

    if literal && access != AccessKind::Read {
        dgns.push(Diagnostic::LiteralScalarNotRead {
            access: arg.access.token.clone(),
        });
    }

    let mut spaces: Vec<FunctionSpace> = vec![];
    let mut stencil: Option<Stencil> = None;
    let mut mesh: Option<MeshSide> = None;
    for (_, extra) in &arg.extras {
        match extra {
            AExtra::Space(ident) => spaces.push(space_of(ident)),
            AExtra::Stencil { shape, extent, .. } => {
                let shape = match shape.token.to_string().as_str() {
                    "x1d" => StencilShape::X1d,
                    "y1d" => StencilShape::Y1d,
                    "xory1d" => StencilShape::Xory1d,
                    "cross" => StencilShape::Cross,
                    "region" => StencilShape::Region,
                    "cross2d" => StencilShape::Cross2d,
                    _ => {
                        dgns.push(Diagnostic::UnknownStencilShape {
                            ident: shape.token.clone(),
                        });
                        StencilShape::Cross
                    }
                };
                let extent = match extent {
                    Some((_, lit)) => match lit.base10_parse::<u64>() {
                        Ok(extent) => Some(extent),
                        Err(error) => {
                            dgns.push(Diagnostic::ParseError { error });
                            None
                        }
                    },
                    None => None,
                };
                stencil = Some(Stencil { shape, extent });
            }
            AExtra::Coarse(kw) => {
                if !has_intergrid {
                    dgns.push(Diagnostic::MeshSideOutsideIntergrid { span: kw.span });
                }
                mesh = Some(MeshSide::Coarse);
            }
            AExtra::Fine(kw) => {
                if !has_intergrid {
                    dgns.push(Diagnostic::MeshSideOutsideIntergrid { span: kw.span });
                }
                mesh = Some(MeshSide::Fine);
            }
        }
    }

    let (category_name, expected) = match arg.category {
        ACategory::Scalar(_) => ("scalar", 0),
        ACategory::Field(_) => ("field", 1),
        ACategory::FieldVector(_) => ("field vector", 1),
        ACategory::Operator(_) => ("operator", 2),
        ACategory::CmaOperator(_) => ("column-wise operator", 2),
    };
    if spaces.len() != expected {
        dgns.push(Diagnostic::WrongSpaceCount {
            category: category_name,
            expected,
            found: spaces.len(),
            span: name_span,
        });
        return None;
    }

    let vector_size = match (&arg.category, &arg.vector_size) {
        (ACategory::FieldVector(_), Some(v)) => match v.size.base10_parse::<u64>() {
            Ok(size) if size >= 2 => size,
            Ok(_) => {
                dgns.push(Diagnostic::VectorSizeTooSmall {
                    size: v.size.clone(),
                });
                return None;
            }
            Err(error) => {
                dgns.push(Diagnostic::ParseError { error });
                return None;
            }
        },
        (ACategory::FieldVector(_), None) => {
            dgns.push(Diagnostic::VectorSizeMissing { name_span });
            return None;
        }
        (_, Some(v)) => {
            dgns.push(Diagnostic::VectorSizeNotAllowed {
                size: v.size.clone(),
            });
            0
        }
        (_, None) => 0,
    };

    if has_intergrid && matches!(arg.category, ACategory::Field(_)) && mesh.is_none() {
        if let AArgName::Name(ident) = &arg.name {
            dgns.push(Diagnostic::IntergridFieldWithoutSide {
                ident: ident.token.clone(),
            });
        }
    }

    let category = match arg.category {
        ACategory::Scalar(_) => ArgCategory::Scalar { literal },
        ACategory::Field(_) => ArgCategory::Field {
            space: spaces[0].clone(),
            stencil,
            mesh,
        },
        ACategory::FieldVector(_) => ArgCategory::FieldVector {
            space: spaces[0].clone(),
            size: vector_size,
        },
        ACategory::Operator(_) => ArgCategory::Operator {
            to: spaces[0].clone(),
            from: spaces[1].clone(),
        },
        ACategory::CmaOperator(_) => ArgCategory::CmaOperator {
            to: spaces[0].clone(),
            from: spaces[1].clone(),
        },
    };

    Some(KernelArg {
        name,
        kind,
        access,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> Result<Rc<KernelCall>, Vec<Diagnostic>> {
        let mut dgns = vec![];
        let ast: ACallSite = syn::parse_str(source).expect("description should tokenize");
        compile_call_site(&ast, &mut dgns).map_err(|()| dgns)
    }

    #[test]
    fn compiles_a_typical_kernel() {
        let call = compile(
            "kernel testkern_qr operates_on cell_column {
                scalar a: real, read;
                field f1: real, inc, w1;
                field f2: real, read, w2, stencil(cross);
                field_vector chi(3): real, read, w0;
                basis w1;
                diff_basis w2;
                quadrature xyoz;
            }",
        )
        .unwrap();
        assert_eq!(call.name, "testkern_qr");
        assert_eq!(call.args.len(), 4);
        assert_eq!(call.qr_rules.len(), 1);
        match &call.args[2].category {
            ArgCategory::Field {
                stencil: Some(stencil),
                ..
            } => {
                assert_eq!(stencil.shape, StencilShape::Cross);
                assert!(stencil.has_unknown_extent());
            }
            other => panic!("expected stencilled field, got {:?}", other),
        }
    }

    #[test]
    fn accepts_literal_scalars() {
        let call = compile(
            "kernel testkern operates_on cell_column {
                scalar 1.0_r_def: real, read;
                scalar -7: integer, read;
                scalar true: logical, read;
            }",
        )
        .unwrap();
        let names: Vec<_> = call.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["1.0_r_def", "-7", ".true."]);
        assert!(call
            .args
            .iter()
            .all(|a| matches!(a.category, ArgCategory::Scalar { literal: true })));
    }

    #[test]
    fn rejects_duplicate_argument_names() {
        let dgns = compile(
            "kernel testkern operates_on cell_column {
                field f1: real, inc, w1;
                field f1: real, read, w2;
            }",
        )
        .unwrap_err();
        assert!(dgns
            .iter()
            .any(|d| matches!(d, Diagnostic::AlreadyDefinedArg { .. })));
    }

    #[test]
    fn rejects_unknown_access_and_kind() {
        let dgns = compile(
            "kernel testkern operates_on cell_column {
                field f1: complex, maybe, w1;
            }",
        )
        .unwrap_err();
        assert!(dgns
            .iter()
            .any(|d| matches!(d, Diagnostic::UnknownScalarKind { .. })));
        assert!(dgns
            .iter()
            .any(|d| matches!(d, Diagnostic::UnknownAccess { .. })));
    }

    #[test]
    fn rejects_intergrid_field_without_side() {
        let dgns = compile(
            "kernel prolong operates_on cell_column {
                field f1: real, inc, w1;
                intergrid { coarse w2; fine w1; }
            }",
        )
        .unwrap_err();
        assert!(dgns
            .iter()
            .any(|d| matches!(d, Diagnostic::IntergridFieldWithoutSide { .. })));
    }

    #[test]
    fn rejects_vector_without_size() {
        let dgns = compile(
            "kernel testkern operates_on cell_column {
                field_vector chi: real, read, w0;
            }",
        )
        .unwrap_err();
        assert!(dgns
            .iter()
            .any(|d| matches!(d, Diagnostic::VectorSizeMissing { .. })));
    }

    #[test]
    fn unknown_quadrature_shape_is_carried_through() {
        let call = compile(
            "kernel testkern operates_on cell_column {
                quadrature gauss;
            }",
        )
        .unwrap();
        assert_eq!(
            call.qr_rules[0].shape,
            QuadratureShape::Other("gauss".into())
        );
    }
}
