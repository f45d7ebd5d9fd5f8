//! Name tables for semantic analysis.
//!
//! The scoped symbol table maps value identifiers to their inferred
//! types; scopes nest for `let ... in`, function parameters, `for`
//! variables, and match clause bindings. Type names and constructor
//! names live in flat program-wide tables because the language forbids
//! shadowing them.

use std::collections::HashMap;

use crate::intern::Symbol;
use crate::types::TypeHandle;

#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<HashMap<Symbol, TypeHandle>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn open_scope(&mut self) {
        log::trace!("symbols: open scope (depth {})", self.scopes.len() + 1);
        self.scopes.push(HashMap::new());
    }

    /// # Panics
    ///
    /// Panics when asked to pop the root scope; that is an internal
    /// phase-ordering bug, not a user error.
    pub fn close_scope(&mut self) {
        log::trace!("symbols: close scope (depth {})", self.scopes.len());
        assert!(self.scopes.len() > 1, "cannot close the root scope");
        self.scopes.pop();
    }

    /// Binds `name` in the innermost scope. Returns `false` when the
    /// scope already had a binding for `name` (which this replaces).
    pub fn insert(&mut self, name: Symbol, ty: TypeHandle) -> bool {
        let scope = self.scopes.last_mut().expect("symbol table has no scope");
        scope.insert(name, ty).is_none()
    }

    pub fn lookup(&self, name: Symbol) -> Option<TypeHandle> {
        for scope in self.scopes.iter().rev() {
            if let Some(&ty) = scope.get(&name) {
                return Some(ty);
            }
        }
        None
    }
}
