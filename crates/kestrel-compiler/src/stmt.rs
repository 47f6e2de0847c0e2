//! Statement compilation.
//!
//! Blocks do not open a scope: a declaration binds in the scope of the
//! enclosing call (or the global scope for top-level statements).

use kestrel_ast::{AssignStmt, Expr, IfStmt, MemberExpr, ReturnStmt, Stmt, VarDeclStmt};
use kestrel_core::CompileError;

use crate::bytecode::OpCode;
use crate::function_compiler::{FunctionCompiler, Result};

impl<'c, 'ast> FunctionCompiler<'c, 'ast> {
    /// Compile a statement.
    pub fn compile_stmt(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Expr(expr) => self.compile_expr_stmt(expr),
            Stmt::VarDecl(decl) => self.compile_var_decl(decl),
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::Return(ret) => self.compile_return(ret, stmt),
            Stmt::Block(block) => {
                for stmt in block.stmts {
                    self.compile_stmt(stmt)?;
                }
                Ok(())
            }
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
        }
    }

    /// Evaluate an expression for its side effects, discarding its value.
    fn compile_expr_stmt(&mut self, expr: &Expr<'ast>) -> Result<()> {
        self.tag("expr");
        match expr {
            // The only place a void call is allowed.
            Expr::Call(call) => self.compile_call(call)?,
            _ => self.compile_expr(expr)?,
        }
        if self.produces_value(expr) {
            self.emitter.emit(OpCode::Pop);
        }
        Ok(())
    }

    /// Bind a new variable in the current scope.
    ///
    /// Without an initializer the variable holds its type's default; struct
    /// types are instantiated with `NEW_STRUCT`.
    fn compile_var_decl(&mut self, decl: &VarDeclStmt<'ast>) -> Result<()> {
        self.tag("decl");
        let default = self.types.default_value(decl.ty)?;
        match decl.init {
            Some(init) => self.compile_expr(init)?,
            None if default.is_struct() => self.emitter.emit_operand(OpCode::NewStruct, default),
            None => self.emitter.emit_constant(default),
        }
        self.emitter.emit_named(OpCode::DefineVar, decl.name);
        Ok(())
    }

    fn compile_assign(&mut self, assign: &AssignStmt<'ast>) -> Result<()> {
        self.tag("assign");
        match assign.target {
            Expr::Ident(ident) => {
                self.compile_expr(assign.value)?;
                self.emitter.emit_named(OpCode::StoreVar, ident.name);
                Ok(())
            }
            Expr::Member(member) => self.compile_member_assign(member, assign.value),
            other => Err(CompileError::UnsupportedNode {
                kind: other.kind_name(),
                context: "assignment target",
            }),
        }
    }

    /// Compile `root.m1...mk = value`.
    ///
    /// Structs are values, so each level is reloaded, updated with
    /// `STORE_FIELD` and handed to the level above, and the root variable is
    /// finally overwritten:
    ///
    /// ```text
    /// [value]
    /// LOAD_VAR root, LOAD_FIELD m1 .. LOAD_FIELD m(k-1), STORE_FIELD mk
    /// ...
    /// LOAD_VAR root, STORE_FIELD m1
    /// STORE_VAR root
    /// ```
    fn compile_member_assign(
        &mut self,
        member: &MemberExpr<'ast>,
        value: &Expr<'ast>,
    ) -> Result<()> {
        let (root, path) = member.path().map_err(|other| CompileError::UnsupportedNode {
            kind: other.kind_name(),
            context: "member assignment root",
        })?;

        self.compile_expr(value)?;
        for depth in (0..path.len()).rev() {
            self.emitter.emit_named(OpCode::LoadVar, root);
            for field in &path[..depth] {
                self.emitter.emit_named(OpCode::LoadField, field);
            }
            self.emitter.emit_named(OpCode::StoreField, path[depth]);
        }
        self.emitter.emit_named(OpCode::StoreVar, root);
        Ok(())
    }

    /// Compile a return, which must agree with the declared return type.
    fn compile_return(&mut self, ret: &ReturnStmt<'ast>, stmt: &Stmt<'ast>) -> Result<()> {
        let Some(function) = self.function() else {
            return Err(CompileError::UnsupportedNode {
                kind: stmt.kind_name(),
                context: "global scope",
            });
        };
        let mismatch = |found| CompileError::ReturnTypeMismatch {
            function: function.name.to_string(),
            declared: function.return_type.to_string(),
            found,
        };

        self.tag("return");
        match (ret.value, function.returns_value()) {
            (Some(value), true) => {
                self.compile_expr(value)?;
                self.emitter.emit(OpCode::ReturnValue);
            }
            (None, false) => self.emitter.emit(OpCode::Return),
            (Some(_), false) => return Err(mismatch("a value")),
            (None, true) => return Err(mismatch("nothing")),
        }
        Ok(())
    }

    /// Compile an if statement.
    ///
    /// `JUMP_IF_FALSE` consumes the condition:
    /// ```text
    /// [condition]
    /// JUMP_IF_FALSE -> else
    /// [then branch]
    /// JUMP -> end          (only with an else branch)
    /// else:
    /// [else branch]
    /// end:
    /// ```
    fn compile_if(&mut self, if_stmt: &IfStmt<'ast>) -> Result<()> {
        self.tag("if");
        self.compile_expr(if_stmt.condition)?;
        let else_jump = self.emitter.emit_jump(OpCode::JumpIfFalse);
        self.compile_stmt(if_stmt.then_stmt)?;

        match if_stmt.else_stmt {
            Some(else_stmt) => {
                self.tag("if");
                let end_jump = self.emitter.emit_jump(OpCode::Jump);
                self.emitter.patch_jump(else_jump);
                self.compile_stmt(else_stmt)?;
                self.emitter.patch_jump(end_jump);
            }
            None => self.emitter.patch_jump(else_jump),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeResolver;
    use bumpalo::Bump;
    use kestrel_ast::{AstBuilder, Program};
    use kestrel_core::Value;

    fn compile_globals<'ast>(program: &Program<'ast>) -> Result<crate::bytecode::Bytecode> {
        let types = TypeResolver::new(program)?;
        let stmts: Vec<Stmt<'ast>> = program.global_stmts().copied().collect();
        FunctionCompiler::for_globals(program, &types).compile_body(&stmts)
    }

    #[test]
    fn declaration_without_initializer_uses_default() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.stmt(b.var_decl("int", "x", None))]);

        let bytecode = compile_globals(&program).unwrap();
        bytecode.assert_opcodes(&[OpCode::LoadConst, OpCode::DefineVar, OpCode::Return]);
        assert_eq!(bytecode[0].operand, Value::Int(0));
        assert_eq!(bytecode[1].operand, Value::from("x"));
        assert_eq!(bytecode[0].debug_tag, "global:decl");
    }

    #[test]
    fn struct_declaration_emits_new_struct() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.struct_decl("Point", &[("int", "x")]),
            b.stmt(b.var_decl("Point", "p", None)),
        ]);

        let bytecode = compile_globals(&program).unwrap();
        bytecode.assert_opcodes(&[OpCode::NewStruct, OpCode::DefineVar, OpCode::Return]);
        assert!(bytecode[0].operand.is_struct());
    }

    #[test]
    fn nested_member_assignment_writes_back() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.stmt(b.assign(b.path("r", &["a", "b"]), b.int(1)))]);

        let bytecode = compile_globals(&program).unwrap();
        bytecode.assert_opcodes(&[
            OpCode::LoadConst,
            OpCode::LoadVar,
            OpCode::LoadField,
            OpCode::StoreField,
            OpCode::LoadVar,
            OpCode::StoreField,
            OpCode::StoreVar,
            OpCode::Return,
        ]);
        assert_eq!(bytecode[2].operand, Value::from("a"));
        assert_eq!(bytecode[3].operand, Value::from("b"));
        assert_eq!(bytecode[5].operand, Value::from("a"));
        assert_eq!(bytecode[6].operand, Value::from("r"));
    }

    #[test]
    fn invalid_assignment_targets() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let program = b.program(&[b.stmt(b.assign(b.int(1), b.int(2)))]);
        assert_eq!(
            compile_globals(&program).unwrap_err(),
            CompileError::UnsupportedNode {
                kind: "Literal",
                context: "assignment target",
            }
        );

        let program = b.program(&[b.stmt(b.assign(b.member(b.call("f", &[]), "x"), b.int(2)))]);
        assert_eq!(
            compile_globals(&program).unwrap_err(),
            CompileError::UnsupportedNode {
                kind: "FunctionCall",
                context: "member assignment root",
            }
        );
    }

    #[test]
    fn return_outside_function_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.stmt(b.ret(None))]);

        assert_eq!(
            compile_globals(&program).unwrap_err(),
            CompileError::UnsupportedNode {
                kind: "Return",
                context: "global scope",
            }
        );
    }

    #[test]
    fn if_else_jumps_are_patched() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.stmt(b.if_stmt(
            b.bool(true),
            b.assign(b.ident("x"), b.int(1)),
            Some(b.assign(b.ident("x"), b.int(2))),
        ))]);

        let bytecode = compile_globals(&program).unwrap();
        bytecode.assert_opcodes(&[
            OpCode::LoadConst,
            OpCode::JumpIfFalse,
            OpCode::LoadConst,
            OpCode::StoreVar,
            OpCode::Jump,
            OpCode::LoadConst,
            OpCode::StoreVar,
            OpCode::Return,
        ]);
        // Past the then branch and its trailing jump.
        assert_eq!(bytecode[1].operand, Value::Int(3));
        // Past the else branch.
        assert_eq!(bytecode[4].operand, Value::Int(2));
    }

    #[test]
    fn if_without_else() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.stmt(b.if_stmt(
            b.ident("c"),
            b.expr_stmt(b.call("log", &[])),
            None,
        ))]);

        let bytecode = compile_globals(&program).unwrap();
        bytecode.assert_opcodes(&[
            OpCode::LoadVar,
            OpCode::JumpIfFalse,
            OpCode::CallFunc,
            OpCode::Pop,
            OpCode::Return,
        ]);
        assert_eq!(bytecode[1].operand, Value::Int(2));
    }
}
