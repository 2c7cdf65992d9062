//! Errors raised during argument generation.
//!
//! Three disjoint kinds with different audiences: `Generation` and
//! `Unsupported` report bad or unsupported kernel metadata to the user;
//! `Internal` signals a defect (a state prior validation should have made
//! unreachable); `NotFrozen`/`Frozen` are caller bugs in the generation
//! protocol. None of them is ever retried.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GenError {
    /// Invalid kernel metadata, reported against the kernel.
    Generation { kernel: String, message: String },
    /// Metadata asks for something generation does not support.
    Unsupported { kernel: String, feature: String },
    /// Broken invariant; a defect, not a user error.
    Internal { message: String },
    /// A position query before `generate()` completed.
    NotFrozen { what: &'static str },
    /// An emit operation after `generate()` completed.
    Frozen { what: &'static str },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenError::Generation { kernel, message } => {
                write!(f, "kernel '{}': {}", kernel, message)
            }
            GenError::Unsupported { kernel, feature } => {
                write!(f, "kernel '{}': no support implemented for {}", kernel, feature)
            }
            GenError::Internal { message } => write!(f, "internal error: {}", message),
            GenError::NotFrozen { what } => write!(
                f,
                "generate() must complete before querying {}",
                what
            ),
            GenError::Frozen { what } => {
                write!(f, "cannot {} once generate() has completed", what)
            }
        }
    }
}

impl Error for GenError {}
