//! Typed model of one kernel call site.
//!
//! This is the read-only input to argument generation: the kernel's declared
//! metadata merged with the names the algorithm layer passes at this call.

use crate::access::AccessKind;
use crate::ir::ty::ScalarKind;

use super::fspace::FunctionSpace;

/// What one kernel invocation is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationSpace {
    /// One vertical column of cells per invocation; the PSy layer loops
    /// over columns.
    CellColumn,
    /// The kernel iterates over the whole horizontal domain itself.
    Domain,
    /// One degree of freedom per invocation.
    Dof,
}

/// Which mesh of an inter-grid kernel an argument lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSide {
    Coarse,
    Fine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilShape {
    X1d,
    Y1d,
    /// Axis chosen at run time; the direction is passed as an argument.
    Xory1d,
    Cross,
    Region,
    /// Cross with per-branch depth; dofmaps gain a branch dimension.
    Cross2d,
}

#[derive(Debug, Clone)]
pub struct Stencil {
    pub shape: StencilShape,
    /// Extent if fixed in the metadata; otherwise passed as an argument.
    pub extent: Option<u64>,
}

impl Stencil {
    pub fn has_unknown_extent(&self) -> bool {
        self.extent.is_none()
    }

    pub fn has_unknown_direction(&self) -> bool {
        self.shape == StencilShape::Xory1d
    }
}

#[derive(Debug, Clone)]
pub enum ArgCategory {
    Scalar {
        /// True when the algorithm layer passed a literal instead of a
        /// variable; the argument name is then the literal text.
        literal: bool,
    },
    Field {
        space: FunctionSpace,
        stencil: Option<Stencil>,
        /// Only set for inter-grid kernels.
        mesh: Option<MeshSide>,
    },
    FieldVector {
        space: FunctionSpace,
        size: u64,
    },
    Operator {
        to: FunctionSpace,
        from: FunctionSpace,
    },
    CmaOperator {
        to: FunctionSpace,
        from: FunctionSpace,
    },
}

#[derive(Debug, Clone)]
pub struct KernelArg {
    pub name: String,
    pub kind: ScalarKind,
    pub access: AccessKind,
    pub category: ArgCategory,
}

impl KernelArg {
    pub fn proxy_name(&self) -> String {
        format!("{}_proxy", self.name)
    }

    pub fn is_field_like(&self) -> bool {
        matches!(
            self.category,
            ArgCategory::Field { .. } | ArgCategory::FieldVector { .. }
        )
    }

    /// Function spaces this argument touches, in declaration order.
    pub fn spaces(&self) -> Vec<&FunctionSpace> {
        match &self.category {
            ArgCategory::Scalar { .. } => vec![],
            ArgCategory::Field { space, .. } | ArgCategory::FieldVector { space, .. } => {
                vec![space]
            }
            ArgCategory::Operator { to, from } | ArgCategory::CmaOperator { to, from } => {
                vec![to, from]
            }
        }
    }

    pub fn mesh(&self) -> Option<MeshSide> {
        match &self.category {
            ArgCategory::Field { mesh, .. } => *mesh,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadratureShape {
    Xyoz,
    Face,
    Edge,
    /// Carried through from the metadata so generation can report it.
    Other(String),
}

#[derive(Debug, Clone)]
pub struct QrRule {
    pub shape: QuadratureShape,
}

impl QrRule {
    pub fn new(shape: QuadratureShape) -> QrRule {
        QrRule { shape }
    }

    /// Name of the quadrature object at this call site, appended to all
    /// variable names the rule introduces.
    pub fn psy_name(&self) -> String {
        match &self.shape {
            QuadratureShape::Xyoz => "qr_xyoz".into(),
            QuadratureShape::Face => "qr_face".into(),
            QuadratureShape::Edge => "qr_edge".into(),
            QuadratureShape::Other(name) => format!("qr_{}", name),
        }
    }

    /// The arguments this rule contributes, in call order.
    pub fn kernel_args(&self) -> Vec<String> {
        let generics: &[&str] = match &self.shape {
            QuadratureShape::Xyoz => &["np_xy", "np_z", "weights_xy", "weights_z"],
            QuadratureShape::Face => &["nfaces", "np_xyz", "weights_xyz"],
            QuadratureShape::Edge => &["nedges", "np_xyz", "weights_xyz"],
            QuadratureShape::Other(_) => &[],
        };
        let psy_name = self.psy_name();
        generics
            .iter()
            .map(|g| format!("{}_{}", g, psy_name))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshProperty {
    AdjacentFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Field,
    Operator,
}

#[derive(Debug, Clone)]
pub struct Intergrid {
    pub coarse: FunctionSpace,
    pub fine: FunctionSpace,
}

#[derive(Debug, Clone)]
pub struct KernelCall {
    pub name: String,
    pub iterates_over: IterationSpace,
    pub coloured: bool,
    pub args: Vec<KernelArg>,
    pub basis_spaces: Vec<FunctionSpace>,
    pub diff_basis_spaces: Vec<FunctionSpace>,
    pub qr_rules: Vec<QrRule>,
    pub eval_targets: Vec<FunctionSpace>,
    pub mesh_properties: Vec<MeshProperty>,
    pub boundary_condition: Option<BoundaryKind>,
    pub intergrid: Option<Intergrid>,
}

impl KernelCall {
    /// Name of the generated subroutine implementing the kernel.
    pub fn code_name(&self) -> String {
        format!("{}_code", self.name)
    }

    pub fn is_intergrid(&self) -> bool {
        self.intergrid.is_some()
    }

    pub fn has_cma(&self) -> bool {
        self.args
            .iter()
            .any(|a| matches!(a.category, ArgCategory::CmaOperator { .. }))
    }

    /// Function spaces touched by any argument, deduplicated, in first-use
    /// order. This order fixes the order of the per-space argument block.
    pub fn unique_function_spaces(&self) -> Vec<FunctionSpace> {
        let mut spaces: Vec<FunctionSpace> = vec![];
        for arg in &self.args {
            for space in arg.spaces() {
                if !spaces.contains(space) {
                    spaces.push(space.clone());
                }
            }
        }
        spaces
    }

    /// The first argument on the given space, if any.
    pub fn arg_on_space(&self, space: &FunctionSpace) -> Option<&KernelArg> {
        self.args.iter().find(|a| a.spaces().contains(&space))
    }

    pub fn needs_basis(&self, space: &FunctionSpace) -> bool {
        self.basis_spaces.contains(space)
    }

    pub fn needs_diff_basis(&self, space: &FunctionSpace) -> bool {
        self.diff_basis_spaces.contains(space)
    }
}
