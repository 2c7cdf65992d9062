//! Function spaces and the variable names derived from them.

/// A discretization space. Implicit-argument names (dof counts, dofmaps,
/// basis arrays) are synthesized deterministically from the space name, so
/// two call sites touching the same space agree on the names they request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpace {
    name: String,
}

impl FunctionSpace {
    pub fn new(name: &str) -> FunctionSpace {
        FunctionSpace { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of dofs per cell.
    pub fn ndf_name(&self) -> String {
        format!("ndf_{}", self.name)
    }

    /// Number of unique dofs over the whole space.
    pub fn undf_name(&self) -> String {
        format!("undf_{}", self.name)
    }

    pub fn map_name(&self) -> String {
        format!("map_{}", self.name)
    }

    /// Basis array evaluated at the points of a quadrature rule.
    pub fn basis_name_qr(&self, qr_name: &str) -> String {
        format!("basis_{}_{}", self.name, qr_name)
    }

    /// Basis array evaluated at the nodes of a target space.
    pub fn basis_name_on(&self, target: &FunctionSpace) -> String {
        format!("basis_{}_on_{}", self.name, target.name)
    }

    pub fn diff_basis_name_qr(&self, qr_name: &str) -> String {
        format!("diff_basis_{}_{}", self.name, qr_name)
    }

    pub fn diff_basis_name_on(&self, target: &FunctionSpace) -> String {
        format!("diff_basis_{}_on_{}", self.name, target.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        let w2 = FunctionSpace::new("w2");
        assert_eq!(w2.ndf_name(), "ndf_w2");
        assert_eq!(w2.undf_name(), "undf_w2");
        assert_eq!(w2.map_name(), "map_w2");
        assert_eq!(w2.basis_name_qr("qr_xyoz"), "basis_w2_qr_xyoz");
        assert_eq!(
            w2.diff_basis_name_on(&FunctionSpace::new("w0")),
            "diff_basis_w2_on_w0"
        );
    }
}
