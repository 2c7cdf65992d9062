//! Custom keywords of the call-site description language.

syn::custom_keyword!(kernel);
syn::custom_keyword!(operates_on);

syn::custom_keyword!(scalar);
syn::custom_keyword!(field);
syn::custom_keyword!(field_vector);
syn::custom_keyword!(operator);
syn::custom_keyword!(cma_operator);

syn::custom_keyword!(basis);
syn::custom_keyword!(diff_basis);
syn::custom_keyword!(quadrature);
syn::custom_keyword!(evaluator);
syn::custom_keyword!(on);
syn::custom_keyword!(mesh);
syn::custom_keyword!(coloured);
syn::custom_keyword!(intergrid);
syn::custom_keyword!(coarse);
syn::custom_keyword!(fine);
syn::custom_keyword!(boundary_condition);
syn::custom_keyword!(stencil);
