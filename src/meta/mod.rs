//! Parses a kernel call-site description and compiles it to the typed
//! call-site model.

mod ast;
mod ast_parse;
mod compile;
mod diagnostic;
mod kw;
mod sess;

mod main;

pub use main::*;
