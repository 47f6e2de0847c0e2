//! Expression nodes.
//!
//! Child expressions are `&'ast` handles into the arena that owns the whole
//! tree, so every node is `Copy`.

use kestrel_core::Value;

use crate::ops::BinaryOp;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(Literal<'ast>),
    /// Variable reference
    Ident(IdentExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Member access (.)
    Member(&'ast MemberExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Name of this node's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "Literal",
            Self::Ident(_) => "Identifier",
            Self::Binary(_) => "BinaryOperation",
            Self::Call(_) => "FunctionCall",
            Self::Member(_) => "MemberAccess",
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'ast> {
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// String literal
    String(&'ast str),
    /// Boolean literal
    Bool(bool),
}

impl Literal<'_> {
    /// The runtime value this literal denotes.
    pub fn to_value(&self) -> Value {
        match *self {
            Literal::Int(v) => Value::Int(v),
            Literal::Float(v) => Value::Float(v),
            Literal::String(s) => Value::from(s),
            Literal::Bool(b) => Value::Bool(b),
        }
    }
}

/// A variable reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    /// Variable name
    pub name: &'ast str,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
}

/// A call to a named function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// Called function name
    pub callee: &'ast str,
    /// Arguments in declaration order
    pub args: &'ast [Expr<'ast>],
}

/// A member access `object.member`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    /// The accessed object
    pub object: &'ast Expr<'ast>,
    /// Field name
    pub member: &'ast str,
}

impl<'ast> MemberExpr<'ast> {
    /// Split a member chain `root.m1...mk` into its root variable and the
    /// member names in access order (`m1` first).
    ///
    /// Returns the first non-identifier, non-member node as `Err` if the chain
    /// is not rooted at a variable.
    pub fn path(&self) -> Result<(&'ast str, Vec<&'ast str>), &'ast Expr<'ast>> {
        let mut members = vec![self.member];
        let mut current = self.object;
        loop {
            match current {
                Expr::Ident(ident) => {
                    members.reverse();
                    return Ok((ident.name, members));
                }
                Expr::Member(inner) => {
                    members.push(inner.member);
                    current = inner.object;
                }
                other => return Err(other),
            }
        }
    }
}
