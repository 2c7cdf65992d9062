//! PSy-layer kernel-call argument generation for LFRic kernels.
//!
//! A kernel call-site description is parsed (`meta`) into a typed model
//! (`kern`); the orderer (`arglist`) turns the model into the argument
//! list the generated kernel call must pass, together with a reference
//! tree (`ir`) and an access ledger (`access`); `gen` renders the final
//! call statement.

pub mod access;
pub mod arglist;
pub mod gen;
pub mod ir;
pub mod kern;
pub mod meta;
