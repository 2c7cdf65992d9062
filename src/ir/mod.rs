//! A small typed IR: reference nodes, literals, data types, and the symbol
//! table backing them.

pub mod literal;
pub mod node;
pub mod symbols;
pub mod ty;
