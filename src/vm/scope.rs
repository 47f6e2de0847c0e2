//! Symbol tables.
//!
//! Tables live in an arena and refer to their parent by [`ScopeId`], so a
//! parent is never owned by its children. The global table is created with the
//! arena and is never released; call scopes are created and released in LIFO
//! order as frames are pushed and popped.

use kestrel_core::{RuntimeError, Value};
use rustc_hash::FxHashMap;

/// Handle to a symbol table in a [`Scopes`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The global scope, root of every chain.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// Name to value bindings with an optional parent.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    bindings: FxHashMap<String, Value>,
    parent: Option<ScopeId>,
}

impl SymbolTable {
    fn with_parent(parent: Option<ScopeId>) -> Self {
        Self {
            bindings: FxHashMap::default(),
            parent,
        }
    }

    /// Insert or overwrite a binding in this table.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a binding in this table only.
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Arena of symbol tables.
#[derive(Debug, Clone)]
pub struct Scopes {
    tables: Vec<SymbolTable>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// Create an arena holding only an empty global table.
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::with_parent(None)],
        }
    }

    /// Create a new table whose parent is `parent`.
    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.tables.len());
        self.tables.push(SymbolTable::with_parent(Some(parent)));
        id
    }

    /// Release the most recently created table.
    ///
    /// Tables are released in reverse creation order; releasing anything but
    /// the newest table, or the global table, is a no-op.
    pub fn release(&mut self, id: ScopeId) {
        if id != ScopeId::GLOBAL && id.0 + 1 == self.tables.len() {
            self.tables.pop();
        }
    }

    /// Number of live tables, the global table included.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> Option<&SymbolTable> {
        self.tables.get(id.0)
    }

    /// Bind `name` in the table `scope` itself, shadowing any ancestor binding.
    ///
    /// `scope` must be live: the global scope or a child not yet released.
    pub fn define(&mut self, scope: ScopeId, name: impl Into<String>, value: Value) {
        let table = self.tables.get_mut(scope.0);
        debug_assert!(table.is_some(), "define in released scope {scope:?}");
        if let Some(table) = table {
            table.define(name, value);
        }
    }

    /// Find the table holding the nearest binding of `name`.
    fn owner(&self, scope: ScopeId, name: &str) -> Result<usize, RuntimeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(table) = self.tables.get(id.0) else {
                break;
            };
            if table.bindings.contains_key(name) {
                return Ok(id.0);
            }
            current = table.parent;
        }
        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Resolve `name` starting at `scope` and walking up through parents.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<&Value, RuntimeError> {
        let owner = self.owner(scope, name)?;
        self.tables[owner]
            .bindings
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Resolve `name` for mutation.
    pub fn resolve_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut Value, RuntimeError> {
        let owner = self.owner(scope, name)?;
        self.tables[owner]
            .bindings
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }
}
