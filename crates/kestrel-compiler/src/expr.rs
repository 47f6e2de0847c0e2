//! Expression compilation.
//!
//! Every expression leaves exactly one value on the operand stack. A call to a
//! function declared `void` leaves none, so it may only appear as a statement.

use kestrel_ast::{BinaryOp, CallExpr, Expr};
use kestrel_core::{ArithmeticOp, CompileError};

use crate::bytecode::OpCode;
use crate::function_compiler::{FunctionCompiler, Result};

/// Map a tree operator to the value operator its opcode applies.
///
/// Logical and bitwise operators have no opcode.
pub fn arithmetic_op(op: BinaryOp) -> Result<ArithmeticOp> {
    let mapped = match op {
        BinaryOp::Add => ArithmeticOp::Add,
        BinaryOp::Sub => ArithmeticOp::Sub,
        BinaryOp::Mul => ArithmeticOp::Mul,
        BinaryOp::Div => ArithmeticOp::Div,
        BinaryOp::Mod => ArithmeticOp::Mod,
        BinaryOp::Equal => ArithmeticOp::Eq,
        BinaryOp::NotEqual => ArithmeticOp::Neq,
        BinaryOp::Less => ArithmeticOp::Lt,
        BinaryOp::LessEqual => ArithmeticOp::Lte,
        BinaryOp::Greater => ArithmeticOp::Gt,
        BinaryOp::GreaterEqual => ArithmeticOp::Gte,
        BinaryOp::LogicalAnd
        | BinaryOp::LogicalOr
        | BinaryOp::BitwiseAnd
        | BinaryOp::BitwiseOr
        | BinaryOp::BitwiseXor => {
            return Err(CompileError::UnsupportedOperator {
                op: op.as_str().to_string(),
            });
        }
    };
    Ok(mapped)
}

impl<'c, 'ast> FunctionCompiler<'c, 'ast> {
    /// Compile an expression.
    pub fn compile_expr(&mut self, expr: &Expr<'ast>) -> Result<()> {
        match expr {
            Expr::Literal(lit) => {
                self.emitter.emit_constant(lit.to_value());
                Ok(())
            }
            Expr::Ident(ident) => {
                self.emitter.emit_named(OpCode::LoadVar, ident.name);
                Ok(())
            }
            Expr::Binary(bin) => {
                let op = arithmetic_op(bin.op)?;
                self.compile_expr(bin.left)?;
                self.compile_expr(bin.right)?;
                self.emitter.emit(OpCode::for_arithmetic(op));
                Ok(())
            }
            Expr::Call(call) => {
                if !self.produces_value(expr) {
                    return Err(CompileError::VoidValue {
                        function: call.callee.to_string(),
                    });
                }
                self.compile_call(call)
            }
            Expr::Member(member) => {
                self.compile_expr(member.object)?;
                self.emitter.emit_named(OpCode::LoadField, member.member);
                Ok(())
            }
        }
    }

    /// Compile a call: arguments left to right, then `CALL_FUNC`.
    ///
    /// Calls to functions declared in this program are arity-checked; other
    /// names are left for the VM to resolve.
    pub(crate) fn compile_call(&mut self, call: &CallExpr<'ast>) -> Result<()> {
        if let Some(decl) = self.program.function(call.callee)
            && decl.arity() != call.args.len()
        {
            return Err(CompileError::ArityMismatch {
                function: call.callee.to_string(),
                expected: decl.arity(),
                found: call.args.len(),
            });
        }

        for arg in call.args {
            self.compile_expr(arg)?;
        }
        self.emitter.emit_named(OpCode::CallFunc, call.callee);
        Ok(())
    }

    /// Check if an expression leaves a value on the stack.
    pub(crate) fn produces_value(&self, expr: &Expr<'ast>) -> bool {
        match expr {
            Expr::Call(call) => self
                .program
                .function(call.callee)
                .is_none_or(|decl| decl.returns_value()),
            _ => true,
        }
    }
}
