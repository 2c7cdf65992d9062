//! Fixed domain tables.

/// Auxiliary CMA-operator scalars passed when the "to" and "from" spaces of
/// the operator are the same. All are read-only integers.
pub const CMA_SAME_FS_PARAMS: &[&str] = &["nrow", "bandwidth", "alpha", "beta", "gamma_m", "gamma_p"];

/// Auxiliary CMA-operator scalars for differing "to"/"from" spaces.
pub const CMA_DIFF_FS_PARAMS: &[&str] = &[
    "nrow", "ncol", "bandwidth", "alpha", "beta", "gamma_m", "gamma_p",
];

/// Quadrature shapes the argument generation supports.
pub const SUPPORTED_QR_SHAPES: &[&str] = &["xyoz", "face", "edge"];

/// Module and proxy type used to access field data.
pub const FIELD_MODULE: &str = "field_mod";
pub const FIELD_PROXY_TYPE: &str = "field_proxy_type";

/// Module and proxy type used to access LMA operator data.
pub const OPERATOR_MODULE: &str = "operator_mod";
pub const OPERATOR_PROXY_TYPE: &str = "operator_proxy_type";
