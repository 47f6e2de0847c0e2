//! Arena-backed constructors for program trees.
//!
//! The parser that normally produces these trees lives outside this
//! workspace; `AstBuilder` is how hosts, tests and benchmarks assemble them.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use kestrel_ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let program = b.program(&[
//!     b.function(
//!         "add",
//!         "int",
//!         &[b.param("int", "a"), b.param("int", "b")],
//!         &[b.ret(Some(b.binary(b.ident("a"), BinaryOp::Add, b.ident("b"))))],
//!     ),
//!     b.function("main", "int", &[], &[b.ret(Some(b.call("add", &[b.int(5), b.int(6)])))]),
//! ]);
//! assert!(program.function("add").is_some());
//! ```

use bumpalo::Bump;

use crate::decl::{FieldDecl, FunctionDecl, Item, Param, StructDecl};
use crate::expr::{BinaryExpr, CallExpr, Expr, IdentExpr, Literal, MemberExpr};
use crate::ops::BinaryOp;
use crate::program::Program;
use crate::stmt::{AssignStmt, Block, IfStmt, ReturnStmt, Stmt, VarDeclStmt};

/// Allocates program tree nodes in a bump arena.
#[derive(Debug, Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder allocating into `arena`.
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn int(&self, value: i64) -> Expr<'ast> {
        Expr::Literal(Literal::Int(value))
    }

    pub fn float(&self, value: f64) -> Expr<'ast> {
        Expr::Literal(Literal::Float(value))
    }

    pub fn string(&self, value: &str) -> Expr<'ast> {
        Expr::Literal(Literal::String(self.str(value)))
    }

    pub fn bool(&self, value: bool) -> Expr<'ast> {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn ident(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(IdentExpr {
            name: self.str(name),
        })
    }

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
        }))
    }

    pub fn call(&self, callee: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            callee: self.str(callee),
            args: self.arena.alloc_slice_copy(args),
        }))
    }

    pub fn member(&self, object: Expr<'ast>, member: &str) -> Expr<'ast> {
        Expr::Member(self.arena.alloc(MemberExpr {
            object: self.arena.alloc(object),
            member: self.str(member),
        }))
    }

    /// Member chain `root.m1...mk`.
    pub fn path(&self, root: &str, members: &[&str]) -> Expr<'ast> {
        members
            .iter()
            .fold(self.ident(root), |object, member| self.member(object, member))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(self.arena.alloc(expr))
    }

    pub fn var_decl(&self, ty: &str, name: &str, init: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::VarDecl(VarDeclStmt {
            ty: self.str(ty),
            name: self.str(name),
            init: init.map(|e| &*self.arena.alloc(e)),
        })
    }

    pub fn assign(&self, target: Expr<'ast>, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target: self.arena.alloc(target),
            value: self.arena.alloc(value),
        })
    }

    pub fn ret(&self, value: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value: value.map(|e| &*self.arena.alloc(e)),
        })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(Block {
            stmts: self.arena.alloc_slice_copy(stmts),
        })
    }

    pub fn if_stmt(
        &self,
        condition: Expr<'ast>,
        then_stmt: Stmt<'ast>,
        else_stmt: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition: self.arena.alloc(condition),
            then_stmt: self.arena.alloc(then_stmt),
            else_stmt: else_stmt.map(|s| &*self.arena.alloc(s)),
        }))
    }

    // ==========================================================================
    // Items
    // ==========================================================================

    pub fn param(&self, ty: &str, name: &str) -> Param<'ast> {
        Param {
            ty: self.str(ty),
            name: self.str(name),
        }
    }

    pub fn function(
        &self,
        name: &str,
        return_type: &str,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
    ) -> Item<'ast> {
        Item::Function(self.arena.alloc(FunctionDecl {
            name: self.str(name),
            return_type: self.str(return_type),
            params: self.arena.alloc_slice_copy(params),
            body: Block {
                stmts: self.arena.alloc_slice_copy(body),
            },
        }))
    }

    /// Struct declaration from `(type, name)` field pairs.
    pub fn struct_decl(&self, name: &str, fields: &[(&str, &str)]) -> Item<'ast> {
        let fields = self
            .arena
            .alloc_slice_fill_iter(fields.iter().map(|(ty, field)| FieldDecl {
                ty: self.str(ty),
                name: self.str(field),
            }));
        Item::Struct(self.arena.alloc(StructDecl {
            name: self.str(name),
            fields,
        }))
    }

    pub fn stmt(&self, stmt: Stmt<'ast>) -> Item<'ast> {
        Item::Stmt(stmt)
    }

    pub fn program(&self, items: &[Item<'ast>]) -> Program<'ast> {
        Program::new(self.arena.alloc_slice_copy(items))
    }
}
