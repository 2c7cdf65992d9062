//! Rendering of the generated PSy-layer kernel call.

use genco::prelude::*;

use crate::arglist::KernCallArgs;

/// Renders the call statement with the generated argument list, e.g.
/// `call testkern_code(nlayers, f1_proxy%data, ndf_w1, undf_w1, map_w1)`.
pub fn gen_call(args: &KernCallArgs) -> Result<String, std::fmt::Error> {
    let tokens: Tokens = quote! {
        call $(args.kern().code_name())($(args.texts().join(", ")))
    };
    tokens.to_string()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::arglist::KernCallArgs;
    use crate::kern::{IterationSpace, KernelCall};

    use super::gen_call;

    #[test]
    fn renders_the_call_statement() {
        let call = KernelCall {
            name: "testkern".into(),
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
        };
        let mut args = KernCallArgs::new(Rc::new(call));
        args.generate().unwrap();
        assert_eq!(gen_call(&args).unwrap(), "call testkern_code(nlayers)");
    }
}
