//! Kernel-call argument generation.
//!
//! `builder` holds the per-operation emitters, `driver` the fixed traversal
//! order over a kernel's metadata, `err` the error kinds both report.

pub mod builder;
pub mod driver;
pub mod err;

pub use builder::{ArgEntry, CellRef, KernCallArgs, NdfInfo, NqpPositions};
pub use err::GenError;
