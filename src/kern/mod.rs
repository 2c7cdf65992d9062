//! Kernel call-site model: the typed, read-only description that argument
//! generation consumes.

pub mod call;
pub mod consts;
pub mod fspace;

pub use call::*;
pub use fspace::FunctionSpace;
