//! Symbol table for one call-site compilation.
//!
//! Symbols are looked up either by name or by tag. Tags give a stable
//! identity to implicit variables (loop indices, dof counts) that several
//! parts of the generation may request independently: `find_or_create` is
//! idempotent per tag, so the first creator wins and every later request
//! observes the same symbol. This is a documented contract, not an accident
//! of the lookup order.

use std::fmt;
use std::rc::Rc;

use super::ty::{DataType, ScalarKind};

#[derive(Debug)]
pub struct Symbol {
    pub name: String,
    pub tag: String,
    pub ty: DataType,
    /// Container symbol this symbol is imported from, if any.
    pub import: Option<Rc<Symbol>>,
}

#[derive(Debug)]
pub struct SymbolNotFound {
    pub name: String,
}

impl fmt::Display for SymbolNotFound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no symbol named or tagged `{}`", self.name)
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Rc<Symbol>>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable { symbols: vec![] }
    }

    pub fn lookup(&self, name: &str) -> Result<Rc<Symbol>, SymbolNotFound> {
        self.symbols
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| SymbolNotFound { name: name.into() })
    }

    pub fn lookup_with_tag(&self, tag: &str) -> Result<Rc<Symbol>, SymbolNotFound> {
        self.symbols
            .iter()
            .find(|s| s.tag == tag)
            .cloned()
            .ok_or_else(|| SymbolNotFound { name: tag.into() })
    }

    /// Creates a new symbol, renaming it (`name_1`, `name_2`, ...) if the
    /// root name is taken. The tag defaults to the root name and must be
    /// fresh: use `find_or_create` when the symbol may already exist.
    pub fn new_symbol(
        &mut self,
        root_name: &str,
        tag: Option<&str>,
        ty: DataType,
        import: Option<Rc<Symbol>>,
    ) -> Rc<Symbol> {
        let name = self.next_available_name(root_name);
        let sym = Rc::new(Symbol {
            tag: tag.unwrap_or(root_name).into(),
            name,
            ty,
            import,
        });
        self.symbols.push(sym.clone());
        sym
    }

    /// Returns the symbol with the given tag, creating it on first request.
    pub fn find_or_create(
        &mut self,
        root_name: &str,
        tag: &str,
        ty: DataType,
        import: Option<Rc<Symbol>>,
    ) -> Rc<Symbol> {
        match self.lookup_with_tag(tag) {
            Ok(sym) => sym,
            Err(_) => self.new_symbol(root_name, Some(tag), ty, import),
        }
    }

    pub fn find_or_create_integer(&mut self, root_name: &str, tag: &str) -> Rc<Symbol> {
        self.find_or_create(root_name, tag, DataType::Scalar(ScalarKind::Integer), None)
    }

    pub fn find_or_create_array(
        &mut self,
        root_name: &str,
        tag: &str,
        kind: ScalarKind,
        rank: usize,
    ) -> Rc<Symbol> {
        self.find_or_create(root_name, tag, DataType::Array { kind, rank }, None)
    }

    /// Returns the container symbol for a module, creating it on first use.
    pub fn find_or_create_container(&mut self, module_name: &str) -> Rc<Symbol> {
        self.find_or_create(module_name, module_name, DataType::Container, None)
    }

    fn next_available_name(&self, root_name: &str) -> String {
        if self.lookup(root_name).is_err() {
            return root_name.into();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}_{}", root_name, n);
            if self.lookup(&candidate).is_err() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_create_is_idempotent_per_tag() {
        let mut table = SymbolTable::new();
        let first = table.find_or_create_integer("nlayers", "nlayers");
        let second = table.find_or_create_integer("nlayers", "nlayers");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn new_symbol_renames_on_clash() {
        let mut table = SymbolTable::new();
        let a = table.new_symbol("cell", None, DataType::Scalar(ScalarKind::Integer), None);
        let b = table.new_symbol(
            "cell",
            Some("other_cell"),
            DataType::Scalar(ScalarKind::Integer),
            None,
        );
        assert_eq!(a.name, "cell");
        assert_eq!(b.name, "cell_1");
        assert_eq!(b.tag, "other_cell");
    }

    #[test]
    fn lookup_by_name_and_tag() {
        let mut table = SymbolTable::new();
        table.find_or_create_integer("colour", "colours_loop_idx");
        assert!(table.lookup("colour").is_ok());
        assert!(table.lookup_with_tag("colours_loop_idx").is_ok());
        assert!(table.lookup("colours_loop_idx").is_err());
    }
}
