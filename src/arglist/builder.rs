//! Builds the argument list for one kernel call.
//!
//! The builder owns three synchronized products: the flat argument list
//! (display text + access mode), the reference tree (one typed node per
//! argument), and the access ledger. The flat list and the tree are only
//! ever extended through `push`, which appends to both, so they cannot
//! diverge. Ledger granularity is decided per operation: see the individual
//! methods for which identity an access is recorded under.
//!
//! It also captures the positions of nlayers, the quadrature point counts
//! and the per-space dof counts, for callers that patch those slots later.

use std::rc::Rc;

use crate::access::{AccessKind, AccessLedger, Signature};
use crate::ir::literal::parse_literal;
use crate::ir::node::Node;
use crate::ir::symbols::{Symbol, SymbolTable};
use crate::ir::ty::{DataType, ScalarKind};
use crate::kern::consts::*;
use crate::kern::{
    ArgCategory, IterationSpace, KernelArg, KernelCall, MeshProperty, MeshSide, QuadratureShape,
};
use crate::kern::FunctionSpace;

use super::err::GenError;

/// One entry of the flat argument list.
#[derive(Debug, Clone)]
pub struct ArgEntry {
    pub text: String,
    pub mode: Option<AccessKind>,
}

/// Position of a dof-count argument, with the space it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdfInfo {
    pub position: usize,
    pub function_space: String,
}

/// Positions of the two point counts of an XYoZ quadrature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NqpPositions {
    pub horizontal: usize,
    pub vertical: usize,
}

/// Display text and reference node for the current cell index, produced
/// together so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct CellRef {
    pub name: String,
    pub node: Node,
}

#[derive(Debug)]
pub struct KernCallArgs {
    kern: Rc<KernelCall>,
    symtab: SymbolTable,
    arglist: Vec<ArgEntry>,
    psyir: Vec<Rc<Node>>,
    ledger: AccessLedger,
    frozen: bool,
    nlayers_positions: Vec<usize>,
    nqp_positions: Vec<NqpPositions>,
    ndf_positions: Vec<NdfInfo>,
}

impl KernCallArgs {
    pub fn new(kern: Rc<KernelCall>) -> KernCallArgs {
        let mut symtab = SymbolTable::new();
        // Named scalar arguments were declared by the algorithm layer;
        // register them so scalar() finds them by name.
        for arg in &kern.args {
            if let ArgCategory::Scalar { literal: false } = arg.category {
                symtab.new_symbol(&arg.name, None, DataType::Scalar(arg.kind), None);
            }
        }
        KernCallArgs {
            kern,
            symtab,
            arglist: vec![],
            psyir: vec![],
            ledger: AccessLedger::new(),
            frozen: false,
            nlayers_positions: vec![],
            nqp_positions: vec![],
            ndf_positions: vec![],
        }
    }

    // ------------------------------------------------------------------
    // Products and positions
    // ------------------------------------------------------------------

    pub fn num_args(&self) -> usize {
        self.arglist.len()
    }

    pub fn entries(&self) -> &[ArgEntry] {
        &self.arglist
    }

    pub fn texts(&self) -> Vec<String> {
        self.arglist.iter().map(|e| e.text.clone()).collect()
    }

    pub fn psyir(&self) -> &[Rc<Node>] {
        &self.psyir
    }

    pub fn ledger(&self) -> &AccessLedger {
        &self.ledger
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symtab
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn nlayers_positions(&self) -> Result<&[usize], GenError> {
        self.require_frozen("nlayers_positions")?;
        Ok(&self.nlayers_positions)
    }

    pub fn nqp_positions(&self) -> Result<&[NqpPositions], GenError> {
        self.require_frozen("nqp_positions")?;
        Ok(&self.nqp_positions)
    }

    pub fn ndf_positions(&self) -> Result<&[NdfInfo], GenError> {
        self.require_frozen("ndf_positions")?;
        Ok(&self.ndf_positions)
    }

    fn require_frozen(&self, what: &'static str) -> Result<(), GenError> {
        if self.frozen {
            Ok(())
        } else {
            Err(GenError::NotFrozen { what })
        }
    }

    pub(crate) fn kern(&self) -> Rc<KernelCall> {
        self.kern.clone()
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    // ------------------------------------------------------------------
    // Low-level append helpers
    // ------------------------------------------------------------------

    /// Appends one argument: the flat entry and its reference node, in one
    /// step. Every argument goes through here.
    fn push(&mut self, node: Node, mode: Option<AccessKind>) -> Result<(), GenError> {
        if self.frozen {
            return Err(GenError::Frozen {
                what: "append an argument",
            });
        }
        self.arglist.push(ArgEntry {
            text: node.render(),
            mode,
        });
        self.psyir.push(Rc::new(node));
        Ok(())
    }

    fn append_integer_reference(
        &mut self,
        root: &str,
        tag: &str,
        mode: Option<AccessKind>,
    ) -> Result<Rc<Symbol>, GenError> {
        let sym = self.symtab.find_or_create_integer(root, tag);
        self.push(Node::reference(&sym), mode)?;
        Ok(sym)
    }

    fn append_array_reference(
        &mut self,
        root: &str,
        tag: &str,
        kind: ScalarKind,
        indices: Vec<Node>,
        mode: Option<AccessKind>,
    ) -> Result<Rc<Symbol>, GenError> {
        let sym = self
            .symtab
            .find_or_create_array(root, tag, kind, indices.len());
        self.push(
            Node::ArrayReference {
                symbol: sym.clone(),
                indices,
            },
            mode,
        )?;
        Ok(sym)
    }

    /// Returns the symbol for a variable of a user-defined type, importing
    /// the type on first use. A second request with the same tag returns
    /// the existing symbol and creates no further import.
    fn get_user_type(
        &mut self,
        module_name: &str,
        user_type: &str,
        name: &str,
        extent: Option<u64>,
    ) -> Rc<Symbol> {
        if let Ok(sym) = self.symtab.lookup_with_tag(name) {
            return sym;
        }
        let module = self.symtab.find_or_create_container(module_name);
        let type_symbol =
            self.symtab
                .find_or_create(user_type, user_type, DataType::Unresolved, Some(module));
        self.symtab.new_symbol(
            name,
            Some(name),
            DataType::Named {
                type_symbol,
                extent,
            },
            None,
        )
    }

    fn append_user_type(
        &mut self,
        module_name: &str,
        user_type: &str,
        members: &[&str],
        name: &str,
        mode: Option<AccessKind>,
    ) -> Result<Rc<Symbol>, GenError> {
        let sym = self.get_user_type(module_name, user_type, name, None);
        self.push(
            Node::StructureReference {
                symbol: sym.clone(),
                members: members.iter().map(|m| m.to_string()).collect(),
            },
            mode,
        )?;
        Ok(sym)
    }

    /// Current cell index: the plain cell loop variable or, for a coloured
    /// kernel, the colour-map lookup `cmap(colour,cell)`. Records read
    /// accesses to everything involved: the plain variant records one event
    /// (`cell`); the coloured variant records three (`colour`, `cell`, and
    /// the map itself with its index components).
    fn cell_ref_name(&mut self) -> CellRef {
        let kernel = self.kern.name.clone();
        let cell = self.symtab.find_or_create_integer("cell", "cell_loop_idx");
        if self.kern.coloured {
            let colour = self
                .symtab
                .find_or_create_integer("colour", "colours_loop_idx");
            let cmap = self
                .symtab
                .find_or_create_array("cmap", "cmap", ScalarKind::Integer, 2);
            self.ledger
                .add(Signature::new(&colour.name), AccessKind::Read, &kernel);
            self.ledger
                .add(Signature::new(&cell.name), AccessKind::Read, &kernel);
            self.ledger.add_with_components(
                Signature::new(&cmap.name),
                AccessKind::Read,
                &kernel,
                vec![colour.name.clone(), cell.name.clone()],
            );
            let node = Node::ArrayReference {
                symbol: cmap.clone(),
                indices: vec![Node::reference(&colour), Node::reference(&cell)],
            };
            CellRef {
                name: node.render(),
                node,
            }
        } else {
            self.ledger
                .add(Signature::new(&cell.name), AccessKind::Read, &kernel);
            CellRef {
                name: cell.name.clone(),
                node: Node::reference(&cell),
            }
        }
    }

    // ------------------------------------------------------------------
    // Per-category operations, in schema order
    // ------------------------------------------------------------------

    /// Adds the current cell index as an explicit argument.
    pub fn cell_position(&mut self) -> Result<(), GenError> {
        let cell_ref = self.cell_ref_name();
        self.push(cell_ref.node, Some(AccessKind::Read))
    }

    /// Adds the cell map and related cell counts for an inter-grid kernel.
    pub fn cell_map(&mut self) -> Result<(), GenError> {
        let kern = self.kern();
        let carg = kern
            .args
            .iter()
            .find(|a| a.mesh() == Some(MeshSide::Coarse))
            .ok_or_else(|| GenError::Internal {
                message: format!(
                    "inter-grid kernel '{}' has no field on the coarse mesh",
                    kern.name
                ),
            })?;
        let farg = kern
            .args
            .iter()
            .find(|a| a.mesh() == Some(MeshSide::Fine))
            .ok_or_else(|| GenError::Internal {
                message: format!(
                    "inter-grid kernel '{}' has no field on the fine mesh",
                    kern.name
                ),
            })?;

        let base = format!("cell_map_{}", carg.name);
        let cell_ref = self.cell_ref_name();
        self.append_array_reference(
            &base,
            &base,
            ScalarKind::Integer,
            vec![Node::FullRange, Node::FullRange, cell_ref.node],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&base), AccessKind::Read, &kern.name);

        // Fine cells per coarse cell in x and y, then the number of columns
        // in the fine mesh.
        for name in &[
            format!("ncpc_{}_{}_x", farg.name, carg.name),
            format!("ncpc_{}_{}_y", farg.name, carg.name),
            format!("ncell_{}", farg.name),
        ] {
            self.append_integer_reference(name, name, Some(AccessKind::Read))?;
            self.ledger
                .add(Signature::new(name), AccessKind::Read, &kern.name);
        }
        Ok(())
    }

    /// Adds the mesh height (nlayers). Only kernels that work on cell
    /// columns or on the whole domain see the vertical extent.
    pub fn mesh_height(&mut self) -> Result<(), GenError> {
        match self.kern.iterates_over {
            IterationSpace::CellColumn | IterationSpace::Domain => {}
            _ => return Ok(()),
        }
        let kernel = self.kern.name.clone();
        self.append_integer_reference("nlayers", "nlayers", Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new("nlayers"), AccessKind::Read, &kernel);
        self.nlayers_positions.push(self.num_args());
        Ok(())
    }

    /// Adds the number of columns in the mesh.
    pub fn mesh_ncell2d(&mut self) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        self.append_integer_reference("ncell_2d", "ncell_2d", Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new("ncell_2d"), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Adds the number of columns in the mesh, excluding halo columns.
    pub fn mesh_ncell2d_no_halos(&mut self) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        self.append_integer_reference(
            "ncell_2d_no_halos",
            "ncell_2d_no_halos",
            Some(AccessKind::Read),
        )?;
        self.ledger.add(
            Signature::new("ncell_2d_no_halos"),
            AccessKind::Read,
            &kernel,
        );
        Ok(())
    }

    /// Adds a scalar argument. Literals become typed constant nodes and
    /// produce no ledger event; named scalars reference their existing
    /// symbol and are recorded with the metadata-declared access.
    pub fn scalar(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let literal = match arg.category {
            ArgCategory::Scalar { literal } => literal,
            _ => {
                return Err(GenError::Internal {
                    message: format!("scalar() called for non-scalar argument '{}'", arg.name),
                })
            }
        };
        if literal {
            // A failure here is a defect: the frontend marked this argument
            // as a literal.
            let node = parse_literal(&arg.name, arg.kind).map_err(|e| GenError::Internal {
                message: format!(
                    "unexpected literal expression '{}' in scalar() when processing kernel '{}': {}",
                    arg.name, self.kern.name, e
                ),
            })?;
            self.push(node, Some(arg.access))
        } else {
            let kernel = self.kern.name.clone();
            let sym = self
                .symtab
                .lookup(&arg.name)
                .map_err(|e| GenError::Internal {
                    message: format!("scalar argument of kernel '{}': {}", kernel, e),
                })?;
            self.push(Node::reference(&sym), Some(arg.access))?;
            self.ledger
                .add(Signature::new(&arg.name), arg.access, &kernel);
            Ok(())
        }
    }

    /// Adds the data buffer of a field. The physical argument is the
    /// proxy's data member, but the ledger event is recorded under the
    /// *field's* name: dependence analysis reasons about field identity,
    /// not storage proxies.
    pub fn field(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let proxy_name = arg.proxy_name();
        self.append_user_type(
            FIELD_MODULE,
            FIELD_PROXY_TYPE,
            &["data"],
            &proxy_name,
            Some(arg.access),
        )?;
        self.ledger
            .add(Signature::new(&arg.name), arg.access, &kernel);
        Ok(())
    }

    /// Adds one data-buffer argument per component of a field vector
    /// (components are 1-indexed), but records a single aggregate ledger
    /// event under the field's name: the vector is one logical field.
    pub fn field_vector(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let size = match arg.category {
            ArgCategory::FieldVector { size, .. } => size,
            _ => {
                return Err(GenError::Internal {
                    message: format!(
                        "field_vector() called for non-vector argument '{}'",
                        arg.name
                    ),
                })
            }
        };
        let kernel = self.kern.name.clone();
        let proxy_name = arg.proxy_name();
        let sym = self.get_user_type(FIELD_MODULE, FIELD_PROXY_TYPE, &proxy_name, Some(size));
        for idx in 1..=size {
            self.push(
                Node::ArrayOfStructuresReference {
                    symbol: sym.clone(),
                    indices: vec![Node::Literal {
                        text: idx.to_string(),
                        kind: ScalarKind::Integer,
                    }],
                    members: vec!["data".into()],
                },
                Some(arg.access),
            )?;
        }
        self.ledger
            .add(Signature::new(&arg.name), arg.access, &kernel);
        Ok(())
    }

    /// Adds an LMA operator: the 3D cell count (always read) followed by
    /// the operator's column data with the metadata-declared access.
    pub fn operator(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let proxy_name = arg.proxy_name();

        self.append_user_type(
            OPERATOR_MODULE,
            OPERATOR_PROXY_TYPE,
            &["ncell_3d"],
            &proxy_name,
            Some(AccessKind::Read),
        )?;
        self.ledger.add(
            Signature::new(&format!("{}%ncell_3d", proxy_name)),
            AccessKind::Read,
            &kernel,
        );

        self.append_user_type(
            OPERATOR_MODULE,
            OPERATOR_PROXY_TYPE,
            &["local_stencil"],
            &proxy_name,
            Some(arg.access),
        )?;
        self.ledger.add(
            Signature::new(&format!("{}%local_stencil", proxy_name)),
            arg.access,
            &kernel,
        );
        Ok(())
    }

    /// Adds a CMA operator: the matrix payload with the declared access,
    /// then the auxiliary integer scalars. Which auxiliary set is used
    /// depends on whether the "to" and "from" spaces differ; either way
    /// the auxiliaries are read-only.
    pub fn cma_operator(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let (to, from) = match &arg.category {
            ArgCategory::CmaOperator { to, from } => (to.clone(), from.clone()),
            _ => {
                return Err(GenError::Internal {
                    message: format!(
                        "cma_operator() called for non-CMA argument '{}'",
                        arg.name
                    ),
                })
            }
        };
        let kernel = self.kern.name.clone();
        let mut components: Vec<&str> = vec!["matrix"];
        if to != from {
            components.extend(CMA_DIFF_FS_PARAMS.iter().copied());
        } else {
            components.extend(CMA_SAME_FS_PARAMS.iter().copied());
        }
        for component in components {
            let name = format!("{}_{}", arg.name, component);
            let mode = if component == "matrix" {
                arg.access
            } else {
                AccessKind::Read
            };
            if component == "matrix" {
                self.append_array_reference(
                    &name,
                    &name,
                    ScalarKind::Real,
                    vec![Node::FullRange, Node::FullRange, Node::FullRange],
                    Some(mode),
                )?;
            } else {
                self.append_integer_reference(&name, &name, Some(mode))?;
            }
            self.ledger.add(Signature::new(&name), mode, &kernel);
        }
        Ok(())
    }

    /// Adds the stencil-size argument when the extent is not fixed in the
    /// metadata.
    pub fn stencil_unknown_extent(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_stencil_size", arg.name);
        let cell_ref = self.cell_ref_name();
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![cell_ref.node],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// 2D variant: one size per stencil branch.
    pub fn stencil_2d_unknown_extent(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_stencil_size", arg.name);
        let cell_ref = self.cell_ref_name();
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![Node::FullRange, cell_ref.node],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Maximum branch length of a 2D stencil; needed because branches are
    /// truncated at domain boundaries.
    pub fn stencil_2d_max_extent(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_max_branch_length", arg.name);
        self.append_integer_reference(&name, &name, Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Adds the direction argument for a stencil whose axis is chosen at
    /// run time.
    pub fn stencil_unknown_direction(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_direction", arg.name);
        let tag = format!("AlgArgs_{}", name);
        self.append_integer_reference(&name, &tag, Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Adds the stencil dofmap, sliced at the current cell.
    pub fn stencil(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_stencil_dofmap", arg.name);
        let cell_ref = self.cell_ref_name();
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![Node::FullRange, Node::FullRange, cell_ref.node],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// 2D-stencil dofmap: the branch direction is baked into an extra
    /// dimension, ordered west, south, east, north.
    pub fn stencil_2d(&mut self, arg: &KernelArg) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let name = format!("{}_stencil_dofmap", arg.name);
        let cell_ref = self.cell_ref_name();
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![
                Node::FullRange,
                Node::FullRange,
                Node::FullRange,
                cell_ref.node,
            ],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Adds the dof count for a space and records its position.
    pub fn fs_common(&mut self, space: &FunctionSpace) -> Result<(), GenError> {
        match self.kern.iterates_over {
            IterationSpace::CellColumn | IterationSpace::Domain => {}
            _ => return Ok(()),
        }
        let kernel = self.kern.name.clone();
        let ndf_name = space.ndf_name();
        self.append_integer_reference(&ndf_name, &ndf_name, Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new(&ndf_name), AccessKind::Read, &kernel);
        self.ndf_positions.push(NdfInfo {
            position: self.num_args(),
            function_space: space.name().into(),
        });
        Ok(())
    }

    /// Adds the unique-dof count and the dofmap for a space. A `domain`
    /// kernel iterates over cells itself and receives the whole 2D dofmap;
    /// a column kernel receives the column slice at the current cell.
    pub fn fs_compulsory_field(&mut self, space: &FunctionSpace) -> Result<(), GenError> {
        let kernel = self.kern.name.clone();
        let undf_name = space.undf_name();
        self.append_integer_reference(&undf_name, &undf_name, Some(AccessKind::Read))?;
        self.ledger
            .add(Signature::new(&undf_name), AccessKind::Read, &kernel);

        let map_name = space.map_name();
        if self.kern.iterates_over == IterationSpace::Domain {
            self.append_array_reference(
                &map_name,
                &map_name,
                ScalarKind::Integer,
                vec![Node::FullRange, Node::FullRange],
                Some(AccessKind::Read),
            )?;
        } else {
            let cell_ref = self.cell_ref_name();
            self.append_array_reference(
                &map_name,
                &map_name,
                ScalarKind::Integer,
                vec![Node::FullRange, cell_ref.node],
                Some(AccessKind::Read),
            )?;
        }
        self.ledger
            .add(Signature::new(&map_name), AccessKind::Read, &kernel);
        Ok(())
    }

    /// Per-space arguments for an inter-grid kernel. The fine side gets
    /// ndf, undf and the whole dofmap; the coarse side gets the compulsory
    /// (sliced) form only.
    pub fn fs_intergrid(&mut self, space: &FunctionSpace) -> Result<(), GenError> {
        let kern = self.kern();
        let arg = kern.arg_on_space(space).ok_or_else(|| GenError::Internal {
            message: format!(
                "no argument of kernel '{}' is on space '{}'",
                kern.name,
                space.name()
            ),
        })?;
        if arg.mesh() == Some(MeshSide::Fine) {
            self.fs_common(space)?;
            let undf_name = space.undf_name();
            self.append_integer_reference(&undf_name, &undf_name, Some(AccessKind::Read))?;
            self.ledger
                .add(Signature::new(&undf_name), AccessKind::Read, &kern.name);
            let map_name = space.map_name();
            self.append_array_reference(
                &map_name,
                &map_name,
                ScalarKind::Integer,
                vec![Node::FullRange, Node::FullRange],
                Some(AccessKind::Read),
            )?;
            self.ledger
                .add(Signature::new(&map_name), AccessKind::Read, &kern.name);
            Ok(())
        } else {
            self.fs_compulsory_field(space)
        }
    }

    /// Adds basis arrays for a space: one per quadrature rule, plus — when
    /// the kernel requests an evaluator — one per evaluator target space.
    /// Both expansions are enumerated in full.
    pub fn basis(&mut self, space: &FunctionSpace) -> Result<(), GenError> {
        let kern = self.kern();
        for rule in &kern.qr_rules {
            let name = space.basis_name_qr(&rule.psy_name());
            self.append_array_reference(
                &name,
                &name,
                ScalarKind::Real,
                vec![Node::FullRange; 4],
                Some(AccessKind::Read),
            )?;
            self.ledger
                .add(Signature::new(&name), AccessKind::Read, &kern.name);
        }
        for target in &kern.eval_targets {
            let name = space.basis_name_on(target);
            self.append_array_reference(
                &name,
                &name,
                ScalarKind::Real,
                vec![Node::FullRange; 3],
                Some(AccessKind::Read),
            )?;
            self.ledger
                .add(Signature::new(&name), AccessKind::Read, &kern.name);
        }
        Ok(())
    }

    /// Differential-basis counterpart of `basis`.
    pub fn diff_basis(&mut self, space: &FunctionSpace) -> Result<(), GenError> {
        let kern = self.kern();
        for rule in &kern.qr_rules {
            let name = space.diff_basis_name_qr(&rule.psy_name());
            self.append_array_reference(
                &name,
                &name,
                ScalarKind::Real,
                vec![Node::FullRange; 4],
                Some(AccessKind::Read),
            )?;
            self.ledger
                .add(Signature::new(&name), AccessKind::Read, &kern.name);
        }
        for target in &kern.eval_targets {
            let name = space.diff_basis_name_on(target);
            self.append_array_reference(
                &name,
                &name,
                ScalarKind::Real,
                vec![Node::FullRange; 3],
                Some(AccessKind::Read),
            )?;
            self.ledger
                .add(Signature::new(&name), AccessKind::Read, &kern.name);
        }
        Ok(())
    }

    /// Adds the boundary-dofs array for a kernel that fixes boundary
    /// conditions on a field.
    pub fn field_bcs_kernel(&mut self) -> Result<(), GenError> {
        let kern = self.kern();
        let farg = kern
            .args
            .iter()
            .find(|a| a.is_field_like())
            .ok_or_else(|| GenError::Generation {
                kernel: kern.name.clone(),
                message: "expected a field argument from which to look up boundary dofs, \
                          but the kernel has none"
                    .into(),
            })?;
        let name = format!("boundary_dofs_{}", farg.name);
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![Node::FullRange, Node::FullRange],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kern.name);
        Ok(())
    }

    /// Adds the boundary-dofs array for a kernel that fixes boundary
    /// conditions on an LMA operator.
    pub fn operator_bcs_kernel(&mut self) -> Result<(), GenError> {
        let kern = self.kern();
        let op_arg = match kern.args.first() {
            Some(arg) if matches!(arg.category, ArgCategory::Operator { .. }) => arg,
            _ => {
                return Err(GenError::Generation {
                    kernel: kern.name.clone(),
                    message: "an operator boundary-condition kernel must take a single LMA \
                              operator as its first argument"
                        .into(),
                })
            }
        };
        let name = format!("boundary_dofs_{}", op_arg.name);
        self.append_array_reference(
            &name,
            &name,
            ScalarKind::Integer,
            vec![Node::FullRange, Node::FullRange],
            Some(AccessKind::Read),
        )?;
        self.ledger
            .add(Signature::new(&name), AccessKind::Read, &kern.name);
        Ok(())
    }

    /// Adds arguments for the mesh properties named in the metadata.
    pub fn mesh_properties(&mut self) -> Result<(), GenError> {
        let kern = self.kern();
        for property in &kern.mesh_properties {
            match property {
                MeshProperty::AdjacentFace => {
                    self.append_integer_reference(
                        "nfaces_re_h",
                        "nfaces_re_h",
                        Some(AccessKind::Read),
                    )?;
                    self.ledger.add(
                        Signature::new("nfaces_re_h"),
                        AccessKind::Read,
                        &kern.name,
                    );
                    let cell_ref = self.cell_ref_name();
                    self.append_array_reference(
                        "adjacent_face",
                        "adjacent_face",
                        ScalarKind::Integer,
                        vec![Node::FullRange, cell_ref.node],
                        Some(AccessKind::Read),
                    )?;
                    self.ledger.add(
                        Signature::new("adjacent_face"),
                        AccessKind::Read,
                        &kern.name,
                    );
                }
            }
        }
        Ok(())
    }

    /// Adds the arguments of every quadrature rule. XYoZ rules record the
    /// positions of their two point counts. An unrecognized shape is
    /// rejected before anything is appended for it; an unrecognized
    /// argument name within a supported shape is a defect.
    pub fn quad_rule(&mut self) -> Result<(), GenError> {
        let kern = self.kern();
        for rule in &kern.qr_rules {
            match &rule.shape {
                QuadratureShape::Xyoz => {
                    self.nqp_positions.push(NqpPositions {
                        horizontal: self.num_args() + 1,
                        vertical: self.num_args() + 2,
                    });
                }
                QuadratureShape::Face | QuadratureShape::Edge => {}
                QuadratureShape::Other(name) => {
                    return Err(GenError::Unsupported {
                        kernel: kern.name.clone(),
                        feature: format!(
                            "quadrature with a shape of '{}'; supported shapes are: {}",
                            name,
                            SUPPORTED_QR_SHAPES.join(", ")
                        ),
                    })
                }
            }
            let psy_name = rule.psy_name();
            for arg_name in rule.kernel_args() {
                let generic = if arg_name.len() > psy_name.len() + 1 {
                    &arg_name[..arg_name.len() - psy_name.len() - 1]
                } else {
                    ""
                };
                match generic {
                    "np_xy" | "np_z" | "nfaces" | "np_xyz" | "nedges" => {
                        self.append_integer_reference(
                            &arg_name,
                            &arg_name,
                            Some(AccessKind::Read),
                        )?;
                    }
                    "weights_xy" | "weights_z" => {
                        self.append_array_reference(
                            &arg_name,
                            &arg_name,
                            ScalarKind::Real,
                            vec![Node::FullRange],
                            Some(AccessKind::Read),
                        )?;
                    }
                    "weights_xyz" => {
                        self.append_array_reference(
                            &arg_name,
                            &arg_name,
                            ScalarKind::Real,
                            vec![Node::FullRange, Node::FullRange],
                            Some(AccessKind::Read),
                        )?;
                    }
                    _ => {
                        return Err(GenError::Internal {
                            message: format!("found invalid quadrature argument '{}'", arg_name),
                        })
                    }
                }
                self.ledger
                    .add(Signature::new(&arg_name), AccessKind::Read, &kern.name);
            }
        }
        Ok(())
    }
}
