//! Global function registry.
//!
//! Maps each function name to its declaration and the absolute address of its
//! first instruction. There is no overloading; defining a name again replaces
//! the earlier entry.

use kestrel_ast::FunctionDecl;
use rustc_hash::FxHashMap;

/// A registered function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionEntry<'ast> {
    /// The declaration node.
    pub decl: &'ast FunctionDecl<'ast>,
    /// Address of the first body instruction.
    pub address: usize,
}

impl<'ast> FunctionEntry<'ast> {
    /// Function name.
    pub fn name(&self) -> &'ast str {
        self.decl.name
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl DoubleEndedIterator<Item = &'ast str> + 'ast {
        self.decl.params.iter().map(|p| p.name)
    }
}

/// Name to (declaration, start address) mapping.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable<'ast> {
    entries: FxHashMap<&'ast str, FunctionEntry<'ast>>,
}

impl<'ast> FunctionTable<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decl` at `address`, replacing any entry of the same name.
    pub fn define(&mut self, decl: &'ast FunctionDecl<'ast>, address: usize) {
        self.entries
            .insert(decl.name, FunctionEntry { decl, address });
    }

    /// Look up a function by name.
    pub fn resolve(&self, name: &str) -> Option<&FunctionEntry<'ast>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry<'ast>> {
        self.entries.values()
    }
}
