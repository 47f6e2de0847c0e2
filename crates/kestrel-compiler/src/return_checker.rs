//! Return path verification for non-void functions.
//!
//! A non-void body that reaches its implicit trailing `RETURN` leaves its
//! caller without a value. The check is structural over the tree: a statement
//! always returns if it is a `return`, a block in which some statement always
//! returns, or an `if` with an `else` whose branches both always return.

use kestrel_ast::Stmt;

/// Check if every path through `stmts` ends in a `return`.
pub fn all_paths_return(stmts: &[Stmt<'_>]) -> bool {
    stmts.iter().any(always_returns)
}

fn always_returns(stmt: &Stmt<'_>) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::Block(block) => all_paths_return(block.stmts),
        Stmt::If(if_stmt) => match if_stmt.else_stmt {
            Some(else_stmt) => always_returns(if_stmt.then_stmt) && always_returns(else_stmt),
            None => false,
        },
        Stmt::Expr(_) | Stmt::VarDecl(_) | Stmt::Assign(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use kestrel_ast::AstBuilder;

    #[test]
    fn empty_body_does_not_return() {
        assert!(!all_paths_return(&[]));
    }

    #[test]
    fn trailing_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert!(all_paths_return(&[
            b.var_decl("int", "x", None),
            b.ret(Some(b.ident("x"))),
        ]));
    }

    #[test]
    fn if_needs_both_branches() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let one_armed = b.if_stmt(b.bool(true), b.ret(Some(b.int(1))), None);
        let both = b.if_stmt(
            b.bool(true),
            b.block(&[b.ret(Some(b.int(1)))]),
            Some(b.ret(Some(b.int(2)))),
        );
        let else_falls_through = b.if_stmt(
            b.bool(true),
            b.ret(Some(b.int(1))),
            Some(b.assign(b.ident("x"), b.int(2))),
        );

        assert!(!all_paths_return(&[one_armed]));
        assert!(all_paths_return(&[both]));
        assert!(!all_paths_return(&[else_falls_through]));
        assert!(all_paths_return(&[one_armed, b.ret(Some(b.int(3)))]));
    }

    #[test]
    fn nested_blocks() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.block(&[b.expr_stmt(b.int(1)), b.ret(None)]);
        assert!(all_paths_return(&[b.block(&[inner])]));
        assert!(!all_paths_return(&[b.block(&[b.expr_stmt(b.int(1))])]));
    }
}
