//! Statement nodes.

use crate::expr::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression evaluated for its side effects (expr;)
    Expr(&'ast Expr<'ast>),
    /// Variable declaration
    VarDecl(VarDeclStmt<'ast>),
    /// Assignment to a variable or a member chain
    Assign(AssignStmt<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Block statement
    Block(Block<'ast>),
    /// If statement
    If(&'ast IfStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Name of this node's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Expr(_) => "ExpressionStatement",
            Self::VarDecl(_) => "VariableDeclaration",
            Self::Assign(_) => "Assignment",
            Self::Return(_) => "Return",
            Self::Block(_) => "Block",
            Self::If(_) => "If",
        }
    }
}

/// A variable declaration.
///
/// Examples:
/// - `int x;`
/// - `int x = 5;`
/// - `Point p;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclStmt<'ast> {
    /// Declared type name
    pub ty: &'ast str,
    /// Variable name
    pub name: &'ast str,
    /// Optional initializer
    pub init: Option<&'ast Expr<'ast>>,
}

/// An assignment `target = value`.
///
/// The target is either an identifier or a member chain rooted at one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    /// Assigned location
    pub target: &'ast Expr<'ast>,
    /// Assigned value
    pub value: &'ast Expr<'ast>,
}

/// A return statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Optional return value
    pub value: Option<&'ast Expr<'ast>>,
}

/// A block of statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    /// Statements in the block
    pub stmts: &'ast [Stmt<'ast>],
}

/// An if statement with an optional else branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Then branch
    pub then_stmt: &'ast Stmt<'ast>,
    /// Optional else branch
    pub else_stmt: Option<&'ast Stmt<'ast>>,
}
