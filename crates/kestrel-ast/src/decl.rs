//! Top-level declarations and items.

use crate::stmt::{Block, Stmt};

/// A top-level item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    /// Function declaration
    Function(&'ast FunctionDecl<'ast>),
    /// Struct type declaration
    Struct(&'ast StructDecl<'ast>),
    /// Global statement, run before `main`
    Stmt(Stmt<'ast>),
}

impl<'ast> Item<'ast> {
    /// Name of this node's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Function(_) => "FunctionDeclaration",
            Self::Struct(_) => "StructDeclaration",
            Self::Stmt(stmt) => stmt.kind_name(),
        }
    }
}

/// A function parameter `type name`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    /// Declared type name
    pub ty: &'ast str,
    /// Parameter name
    pub name: &'ast str,
}

/// A function declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    /// Function name
    pub name: &'ast str,
    /// Declared return type name (`void` for none)
    pub return_type: &'ast str,
    /// Parameters in declaration order
    pub params: &'ast [Param<'ast>],
    /// Function body
    pub body: Block<'ast>,
}

impl<'ast> FunctionDecl<'ast> {
    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check if the function is declared to return a value.
    pub fn returns_value(&self) -> bool {
        !self.return_type.eq_ignore_ascii_case("void")
    }
}

/// A struct field `type name`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    /// Declared type name
    pub ty: &'ast str,
    /// Field name
    pub name: &'ast str,
}

/// A struct type declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructDecl<'ast> {
    /// Struct name
    pub name: &'ast str,
    /// Fields in declaration order
    pub fields: &'ast [FieldDecl<'ast>],
}
