//! Fixed-schema traversal over a kernel's metadata.
//!
//! `generate` walks the call-site description in the order the kernel
//! interface demands and invokes one builder operation per entry. Argument
//! categories are a closed enum, so the dispatch below is exhaustive: a new
//! category cannot be added without this match being updated.

use crate::kern::{ArgCategory, BoundaryKind, IterationSpace, KernelArg, Stencil, StencilShape};

use super::builder::KernCallArgs;
use super::err::GenError;

impl KernCallArgs {
    /// Generates the full argument list. Single transition from the open
    /// state to the frozen state; position queries become valid afterwards
    /// and no further arguments can be appended.
    pub fn generate(&mut self) -> Result<(), GenError> {
        if self.is_frozen() {
            return Err(GenError::Frozen {
                what: "run generate()",
            });
        }
        let kern = self.kern();

        // CMA kernels receive the current cell and the number of mesh
        // columns explicitly.
        if kern.has_cma() {
            self.cell_position()?;
        }
        self.mesh_height()?;
        // A domain kernel loops over columns itself and needs to know how
        // many there are, excluding halo columns.
        if kern.iterates_over == IterationSpace::Domain {
            self.mesh_ncell2d_no_halos()?;
        }
        if kern.is_intergrid() {
            self.cell_map()?;
        }
        if kern.has_cma() {
            self.mesh_ncell2d()?;
        }

        for arg in &kern.args {
            match &arg.category {
                ArgCategory::Scalar { .. } => self.scalar(arg)?,
                ArgCategory::Field { stencil, .. } => {
                    self.field(arg)?;
                    if let Some(stencil) = stencil {
                        self.stencil_args(arg, stencil)?;
                    }
                }
                ArgCategory::FieldVector { .. } => self.field_vector(arg)?,
                ArgCategory::Operator { .. } => self.operator(arg)?,
                ArgCategory::CmaOperator { .. } => self.cma_operator(arg)?,
            }
        }

        for space in kern.unique_function_spaces() {
            if kern.is_intergrid() {
                self.fs_intergrid(&space)?;
            } else {
                self.fs_common(&space)?;
                // Only spaces carrying field data need undf and the dofmap.
                let has_field = kern
                    .args
                    .iter()
                    .any(|a| a.is_field_like() && a.spaces().contains(&&space));
                if has_field {
                    self.fs_compulsory_field(&space)?;
                }
            }
            if kern.needs_basis(&space) {
                self.basis(&space)?;
            }
            if kern.needs_diff_basis(&space) {
                self.diff_basis(&space)?;
            }
        }

        self.quad_rule()?;
        self.mesh_properties()?;
        match kern.boundary_condition {
            Some(BoundaryKind::Field) => self.field_bcs_kernel()?,
            Some(BoundaryKind::Operator) => self.operator_bcs_kernel()?,
            None => {}
        }

        self.freeze();
        Ok(())
    }

    /// Stencil arguments follow the field they belong to: run-time extent,
    /// then run-time direction, then the dofmap itself.
    fn stencil_args(&mut self, arg: &KernelArg, stencil: &Stencil) -> Result<(), GenError> {
        if stencil.shape == StencilShape::Cross2d {
            if stencil.has_unknown_extent() {
                self.stencil_2d_unknown_extent(arg)?;
            }
            self.stencil_2d_max_extent(arg)?;
            self.stencil_2d(arg)?;
        } else {
            if stencil.has_unknown_extent() {
                self.stencil_unknown_extent(arg)?;
            }
            if stencil.has_unknown_direction() {
                self.stencil_unknown_direction(arg)?;
            }
            self.stencil(arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::access::{AccessKind, Signature};
    use crate::arglist::builder::KernCallArgs;
    use crate::arglist::err::GenError;
    use crate::ir::ty::ScalarKind;
    use crate::kern::*;

    fn empty_call(name: &str) -> KernelCall {
        KernelCall {
            name: name.into(),
            iterates_over: IterationSpace::CellColumn,
            coloured: false,
            args: vec![],
            basis_spaces: vec![],
            diff_basis_spaces: vec![],
            qr_rules: vec![],
            eval_targets: vec![],
            mesh_properties: vec![],
            boundary_condition: None,
            intergrid: None,
        }
    }

    fn field_arg(name: &str, space: &str, access: AccessKind) -> KernelArg {
        KernelArg {
            name: name.into(),
            kind: ScalarKind::Real,
            access,
            category: ArgCategory::Field {
                space: FunctionSpace::new(space),
                stencil: None,
                mesh: None,
            },
        }
    }

    fn builder(call: KernelCall) -> KernCallArgs {
        KernCallArgs::new(Rc::new(call))
    }

    #[test]
    fn arglist_and_psyir_stay_synchronized() {
        let mut call = empty_call("testkern");
        call.args.push(field_arg("f1", "w1", AccessKind::Inc));
        call.args.push(KernelArg {
            name: "chi".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::FieldVector {
                space: FunctionSpace::new("w0"),
                size: 3,
            },
        });
        let mut args = builder(call);

        args.mesh_height().unwrap();
        assert_eq!(args.num_args(), args.psyir().len());
        let kern = args.kern();
        args.field(&kern.args[0]).unwrap();
        assert_eq!(args.num_args(), args.psyir().len());
        args.field_vector(&kern.args[1]).unwrap();
        assert_eq!(args.num_args(), args.psyir().len());
        args.quad_rule().unwrap();
        assert_eq!(args.num_args(), args.psyir().len());

        // Display text always matches the rendered reference node.
        for (entry, node) in args.entries().iter().zip(args.psyir()) {
            assert_eq!(entry.text, node.render());
        }
    }

    #[test]
    fn mesh_height_skipped_for_dof_kernels() {
        let mut call = empty_call("dofkern");
        call.iterates_over = IterationSpace::Dof;
        let mut args = builder(call);
        args.mesh_height().unwrap();
        assert_eq!(args.num_args(), 0);
        args.generate().unwrap();
        assert!(args.nlayers_positions().unwrap().is_empty());
    }

    #[test]
    fn nlayers_position_is_recorded() {
        let mut args = builder(empty_call("testkern"));
        args.generate().unwrap();
        assert_eq!(args.texts(), ["nlayers"]);
        assert_eq!(args.nlayers_positions().unwrap(), [1]);
    }

    #[test]
    fn position_queries_require_frozen_state() {
        let mut args = builder(empty_call("testkern"));
        assert!(matches!(
            args.nlayers_positions(),
            Err(GenError::NotFrozen { .. })
        ));
        assert!(matches!(
            args.nqp_positions(),
            Err(GenError::NotFrozen { .. })
        ));
        assert!(matches!(
            args.ndf_positions(),
            Err(GenError::NotFrozen { .. })
        ));
        args.generate().unwrap();
        assert!(args.nlayers_positions().is_ok());
        assert!(args.nqp_positions().is_ok());
        assert!(args.ndf_positions().is_ok());
    }

    #[test]
    fn no_appends_once_frozen() {
        let mut args = builder(empty_call("testkern"));
        args.generate().unwrap();
        assert!(matches!(args.mesh_height(), Err(GenError::Frozen { .. })));
        assert!(matches!(args.generate(), Err(GenError::Frozen { .. })));
    }

    #[test]
    fn plain_cell_index_records_one_read() {
        let mut args = builder(empty_call("testkern"));
        args.cell_position().unwrap();
        assert_eq!(args.num_args(), 1);
        assert_eq!(args.texts(), ["cell"]);
        assert_eq!(args.ledger().events().len(), 1);
        assert_eq!(args.ledger().events()[0].kind, AccessKind::Read);
    }

    #[test]
    fn coloured_cell_index_records_three_reads() {
        let mut call = empty_call("testkern");
        call.coloured = true;
        let mut args = builder(call);
        args.cell_position().unwrap();
        assert_eq!(args.num_args(), 1);
        assert_eq!(args.texts(), ["cmap(colour,cell)"]);
        let bases: Vec<_> = args
            .ledger()
            .events()
            .iter()
            .map(|e| e.signature.base().to_string())
            .collect();
        assert_eq!(bases, ["colour", "cell", "cmap"]);
        assert!(args
            .ledger()
            .events()
            .iter()
            .all(|e| e.kind == AccessKind::Read));
        assert_eq!(args.ledger().events()[2].components, ["colour", "cell"]);
    }

    #[test]
    fn field_access_is_recorded_under_the_field_name() {
        let mut call = empty_call("testkern");
        call.args.push(field_arg("f1", "w1", AccessKind::Inc));
        let mut args = builder(call);
        let kern = args.kern();
        args.field(&kern.args[0]).unwrap();
        assert_eq!(args.texts(), ["f1_proxy%data"]);
        let events = args.ledger().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].signature, Signature::new("f1"));
        assert_eq!(events[0].kind, AccessKind::Inc);
    }

    #[test]
    fn field_vector_appends_components_but_one_event() {
        let mut call = empty_call("testkern");
        call.args.push(KernelArg {
            name: "chi".into(),
            kind: ScalarKind::Real,
            access: AccessKind::ReadWrite,
            category: ArgCategory::FieldVector {
                space: FunctionSpace::new("w0"),
                size: 3,
            },
        });
        let mut args = builder(call);
        let kern = args.kern();
        args.field_vector(&kern.args[0]).unwrap();
        assert_eq!(
            args.texts(),
            ["chi_proxy(1)%data", "chi_proxy(2)%data", "chi_proxy(3)%data"]
        );
        let events = args.ledger().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].signature, Signature::new("chi"));
        assert_eq!(events[0].kind, AccessKind::ReadWrite);
    }

    fn cma_arg(access: AccessKind, to: &str, from: &str) -> KernelArg {
        KernelArg {
            name: "cma_op1".into(),
            kind: ScalarKind::Real,
            access,
            category: ArgCategory::CmaOperator {
                to: FunctionSpace::new(to),
                from: FunctionSpace::new(from),
            },
        }
    }

    #[test]
    fn cma_operator_different_spaces() {
        let mut call = empty_call("testkern");
        call.args.push(cma_arg(AccessKind::ReadWrite, "w1", "w2"));
        let mut args = builder(call);
        let kern = args.kern();
        args.cma_operator(&kern.args[0]).unwrap();
        assert_eq!(
            args.texts(),
            [
                "cma_op1_matrix",
                "cma_op1_nrow",
                "cma_op1_ncol",
                "cma_op1_bandwidth",
                "cma_op1_alpha",
                "cma_op1_beta",
                "cma_op1_gamma_m",
                "cma_op1_gamma_p"
            ]
        );
        assert_eq!(args.entries()[0].mode, Some(AccessKind::ReadWrite));
        assert!(args.entries()[1..]
            .iter()
            .all(|e| e.mode == Some(AccessKind::Read)));
    }

    #[test]
    fn cma_operator_same_space() {
        let mut call = empty_call("testkern");
        call.args.push(cma_arg(AccessKind::Write, "w3", "w3"));
        let mut args = builder(call);
        let kern = args.kern();
        args.cma_operator(&kern.args[0]).unwrap();
        assert_eq!(
            args.texts(),
            [
                "cma_op1_matrix",
                "cma_op1_nrow",
                "cma_op1_bandwidth",
                "cma_op1_alpha",
                "cma_op1_beta",
                "cma_op1_gamma_m",
                "cma_op1_gamma_p"
            ]
        );
        assert_eq!(args.entries()[0].mode, Some(AccessKind::Write));
    }

    #[test]
    fn basis_expansion_is_rules_plus_targets() {
        let mut call = empty_call("testkern");
        call.qr_rules = vec![
            QrRule::new(QuadratureShape::Xyoz),
            QrRule::new(QuadratureShape::Face),
        ];
        call.eval_targets = vec![
            FunctionSpace::new("w0"),
            FunctionSpace::new("w1"),
            FunctionSpace::new("w2"),
        ];
        let mut args = builder(call);
        let space = FunctionSpace::new("w3");
        args.basis(&space).unwrap();
        // 2 rule-driven + 3 target-driven, never 2 * 3.
        assert_eq!(args.num_args(), 5);
        assert_eq!(
            args.texts(),
            [
                "basis_w3_qr_xyoz",
                "basis_w3_qr_face",
                "basis_w3_on_w0",
                "basis_w3_on_w1",
                "basis_w3_on_w2"
            ]
        );
    }

    #[test]
    fn unsupported_quadrature_shape_is_rejected() {
        let mut call = empty_call("testkern");
        call.qr_rules = vec![QrRule::new(QuadratureShape::Other("gauss".into()))];
        let mut args = builder(call);
        let before = args.num_args();
        let err = args.quad_rule().unwrap_err();
        assert!(matches!(err, GenError::Unsupported { .. }));
        assert_eq!(args.num_args(), before);
    }

    #[test]
    fn xyoz_quadrature_records_point_count_positions() {
        let mut call = empty_call("testkern");
        call.qr_rules = vec![QrRule::new(QuadratureShape::Xyoz)];
        let mut args = builder(call);
        args.generate().unwrap();
        assert_eq!(
            args.texts(),
            [
                "nlayers",
                "np_xy_qr_xyoz",
                "np_z_qr_xyoz",
                "weights_xy_qr_xyoz",
                "weights_z_qr_xyoz"
            ]
        );
        let nqp = args.nqp_positions().unwrap();
        assert_eq!(nqp.len(), 1);
        assert_eq!(nqp[0].horizontal, 2);
        assert_eq!(nqp[0].vertical, 3);
    }

    #[test]
    fn malformed_literal_is_an_internal_error() {
        let mut call = empty_call("testkern");
        call.args.push(KernelArg {
            name: "f1".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Scalar { literal: true },
        });
        let mut args = builder(call);
        let kern = args.kern();
        let err = args.scalar(&kern.args[0]).unwrap_err();
        assert!(matches!(err, GenError::Internal { .. }));
    }

    #[test]
    fn literal_scalar_produces_no_access_event() {
        let mut call = empty_call("testkern");
        call.args.push(KernelArg {
            name: "1.0_r_def".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Scalar { literal: true },
        });
        call.args.push(KernelArg {
            name: "a".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Scalar { literal: false },
        });
        let mut args = builder(call);
        args.generate().unwrap();
        assert_eq!(args.texts(), ["nlayers", "1.0_r_def", "a"]);
        assert!(args
            .ledger()
            .for_signature(&Signature::new("a"))
            .next()
            .is_some());
        assert!(args
            .ledger()
            .for_signature(&Signature::new("1.0_r_def"))
            .next()
            .is_none());
    }

    #[test]
    fn boundary_fixup_requires_a_field_argument() {
        let mut call = empty_call("enforce_bc_kernel");
        call.boundary_condition = Some(BoundaryKind::Field);
        call.args.push(KernelArg {
            name: "op1".into(),
            kind: ScalarKind::Real,
            access: AccessKind::ReadWrite,
            category: ArgCategory::Operator {
                to: FunctionSpace::new("w1"),
                from: FunctionSpace::new("w2"),
            },
        });
        let mut args = builder(call);
        let err = args.generate().unwrap_err();
        assert!(matches!(err, GenError::Generation { .. }));
    }

    #[test]
    fn intergrid_argument_order() {
        let mut call = empty_call("prolong_kernel");
        let fine = FunctionSpace::new("w1");
        let coarse = FunctionSpace::new("w2");
        call.args.push(KernelArg {
            name: "field1".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Inc,
            category: ArgCategory::Field {
                space: fine.clone(),
                stencil: None,
                mesh: Some(MeshSide::Fine),
            },
        });
        call.args.push(KernelArg {
            name: "field2".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Field {
                space: coarse.clone(),
                stencil: None,
                mesh: Some(MeshSide::Coarse),
            },
        });
        call.intergrid = Some(Intergrid { coarse, fine });
        let mut args = builder(call);
        args.generate().unwrap();
        assert_eq!(
            args.texts(),
            [
                "nlayers",
                "cell_map_field2(:,:,cell)",
                "ncpc_field1_field2_x",
                "ncpc_field1_field2_y",
                "ncell_field1",
                "field1_proxy%data",
                "field2_proxy%data",
                "ndf_w1",
                "undf_w1",
                "map_w1",
                "undf_w2",
                "map_w2(:,cell)"
            ]
        );
    }

    #[test]
    fn domain_kernel_receives_whole_dofmap() {
        let mut call = empty_call("domain_kernel");
        call.iterates_over = IterationSpace::Domain;
        call.args.push(field_arg("f1", "w3", AccessKind::Write));
        let mut args = builder(call);
        args.generate().unwrap();
        assert_eq!(
            args.texts(),
            [
                "nlayers",
                "ncell_2d_no_halos",
                "f1_proxy%data",
                "ndf_w3",
                "undf_w3",
                "map_w3"
            ]
        );
        assert_eq!(
            args.ndf_positions().unwrap(),
            [super::super::builder::NdfInfo {
                position: 4,
                function_space: "w3".into()
            }]
        );
    }

    #[test]
    fn stencil_arguments_follow_their_field() {
        let mut call = empty_call("stencil_kernel");
        call.args.push(KernelArg {
            name: "f2".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Field {
                space: FunctionSpace::new("w2"),
                stencil: Some(Stencil {
                    shape: StencilShape::Xory1d,
                    extent: None,
                }),
                mesh: None,
            },
        });
        let mut args = builder(call);
        let kern = args.kern();
        args.field(&kern.args[0]).unwrap();
        if let ArgCategory::Field {
            stencil: Some(stencil),
            ..
        } = &kern.args[0].category
        {
            args.stencil_args(&kern.args[0], stencil).unwrap();
        }
        assert_eq!(
            args.texts(),
            [
                "f2_proxy%data",
                "f2_stencil_size(cell)",
                "f2_direction",
                "f2_stencil_dofmap(:,:,cell)"
            ]
        );
    }

    #[test]
    fn cross2d_stencil_arguments() {
        let mut call = empty_call("stencil_kernel");
        call.args.push(KernelArg {
            name: "f2".into(),
            kind: ScalarKind::Real,
            access: AccessKind::Read,
            category: ArgCategory::Field {
                space: FunctionSpace::new("w2"),
                stencil: Some(Stencil {
                    shape: StencilShape::Cross2d,
                    extent: None,
                }),
                mesh: None,
            },
        });
        let mut args = builder(call);
        args.generate().unwrap();
        assert_eq!(
            args.texts(),
            [
                "nlayers",
                "f2_proxy%data",
                "f2_stencil_size(:,cell)",
                "f2_max_branch_length",
                "f2_stencil_dofmap(:,:,:,cell)",
                "ndf_w2",
                "undf_w2",
                "map_w2(:,cell)"
            ]
        );
    }
}
