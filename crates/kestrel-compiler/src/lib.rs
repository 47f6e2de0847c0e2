//! Kestrel Compiler
//!
//! A single-pass compiler from a [`Program`] tree to one linear
//! [`Bytecode`] array plus a [`FunctionTable`].
//!
//! ## Layout
//!
//! ```text
//! [fn 1 body] RETURN
//! [fn 2 body] RETURN
//! ...
//! [global statements] RETURN   <- init_address
//! ```
//!
//! Function start addresses are absolute indices into the array. Global
//! statements run once, in the global scope, before `main`.
//!
//! ## Modules
//!
//! - [`bytecode`]: Bytecode types (OpCode, Instruction, Bytecode)
//! - [`emit`]: Instruction emitter with debug tags and jump patching
//! - [`function_table`]: Function name to declaration and start address
//! - [`return_checker`]: Return path verification for non-void functions
//! - [`types`]: Type name resolution and struct prototypes

pub mod bytecode;
pub mod emit;
mod expr;
pub mod function_compiler;
pub mod function_table;
pub mod return_checker;
mod stmt;
pub mod types;

pub use bytecode::{Bytecode, Instruction, OpCode};
pub use emit::{BytecodeEmitter, JumpLabel};
pub use expr::arithmetic_op;
pub use function_compiler::FunctionCompiler;
pub use function_table::{FunctionEntry, FunctionTable};
pub use types::TypeResolver;

// Re-export CompileError from core for convenience
pub use kestrel_core::CompileError;

use kestrel_ast::{Item, Program, Stmt};
use tracing::{debug, instrument};

/// Output of compilation.
#[derive(Debug, Clone)]
pub struct CompiledProgram<'ast> {
    /// All function bodies followed by the global initializer.
    pub bytecode: Bytecode,
    /// Registered functions.
    pub functions: FunctionTable<'ast>,
    /// Address of the global initializer.
    pub init_address: usize,
}

/// Entry point for compilation.
pub struct Compiler;

impl Compiler {
    /// Compile a whole program.
    ///
    /// Compilation stops at the first error; no partial bytecode is returned.
    #[instrument(skip_all, name = "compile_program")]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_program<'ast>(
        program: &Program<'ast>,
    ) -> Result<CompiledProgram<'ast>, CompileError> {
        let types = TypeResolver::new(program)?;
        let mut bytecode = Bytecode::new();
        let mut functions = FunctionTable::new();

        for item in program.items() {
            let Item::Function(decl) = item else {
                continue;
            };
            let address = bytecode.len();
            let body = FunctionCompiler::compile_function(program, &types, *decl)?;
            debug!(
                function = decl.name,
                address,
                len = body.len(),
                "registered function"
            );
            bytecode += body;
            functions.define(*decl, address);
        }

        let init_address = bytecode.len();
        let globals: Vec<Stmt<'ast>> = program.global_stmts().copied().collect();
        bytecode += FunctionCompiler::for_globals(program, &types).compile_body(&globals)?;

        debug!(
            functions = functions.len(),
            instructions = bytecode.len(),
            init_address,
            "compiled program"
        );
        Ok(CompiledProgram {
            bytecode,
            functions,
            init_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use kestrel_ast::{AstBuilder, BinaryOp};
    use kestrel_core::Value;

    #[test]
    fn compiles_add_and_main() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.function(
                "add",
                "int",
                &[b.param("int", "a"), b.param("int", "b")],
                &[b.ret(Some(b.binary(b.ident("a"), BinaryOp::Add, b.ident("b"))))],
            ),
            b.function(
                "main",
                "int",
                &[],
                &[b.ret(Some(b.call("add", &[b.int(5), b.int(6)])))],
            ),
        ]);

        let compiled = Compiler::compile_program(&program).unwrap();
        let add = compiled.functions.resolve("add").unwrap();
        let main = compiled.functions.resolve("main").unwrap();
        assert_eq!(add.address, 0);
        assert_eq!(main.address, 5);
        assert_eq!(compiled.init_address, 10);

        // No parameter stores: the VM binds parameters.
        compiled.bytecode.assert_opcodes(&[
            OpCode::LoadVar,
            OpCode::LoadVar,
            OpCode::Add,
            OpCode::ReturnValue,
            OpCode::Return,
            OpCode::LoadConst,
            OpCode::LoadConst,
            OpCode::CallFunc,
            OpCode::ReturnValue,
            OpCode::Return,
            OpCode::Return,
        ]);
        assert_eq!(compiled.bytecode[0].debug_tag, "add:return");
        assert_eq!(compiled.bytecode[4].debug_tag, "add:end");
        assert_eq!(compiled.bytecode[7].operand, Value::from("add"));
        assert_eq!(compiled.bytecode[10].debug_tag, "global:end");
    }

    #[test]
    fn every_modeled_operator_has_an_opcode() {
        let cases = [
            (BinaryOp::Sub, OpCode::Sub),
            (BinaryOp::Mul, OpCode::Mul),
            (BinaryOp::Div, OpCode::Div),
            (BinaryOp::Mod, OpCode::Mod),
            (BinaryOp::Equal, OpCode::Eq),
            (BinaryOp::NotEqual, OpCode::Neq),
            (BinaryOp::Less, OpCode::Lt),
            (BinaryOp::LessEqual, OpCode::Lte),
            (BinaryOp::Greater, OpCode::Gt),
            (BinaryOp::GreaterEqual, OpCode::Gte),
        ];
        for (op, opcode) in cases {
            let arena = Bump::new();
            let b = AstBuilder::new(&arena);
            let program = b.program(&[b.function(
                "main",
                "int",
                &[],
                &[b.ret(Some(b.binary(b.int(1), op, b.int(2))))],
            )]);
            let compiled = Compiler::compile_program(&program).unwrap();
            assert_eq!(compiled.bytecode[2].opcode, opcode, "operator {}", op);
        }
    }

    #[test]
    fn unsupported_operator_aborts_compilation() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.function(
            "main",
            "bool",
            &[],
            &[b.ret(Some(b.binary(b.bool(true), BinaryOp::LogicalOr, b.bool(false))))],
        )]);

        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::UnsupportedOperator {
                op: "||".to_string()
            }
        );
    }

    #[test]
    fn arity_mismatch_is_a_compile_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.function(
                "add",
                "int",
                &[b.param("int", "a"), b.param("int", "b")],
                &[b.ret(Some(b.binary(b.ident("a"), BinaryOp::Add, b.ident("b"))))],
            ),
            b.function("main", "int", &[], &[b.ret(Some(b.call("add", &[b.int(5)])))]),
        ]);

        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::ArityMismatch {
                function: "add".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn undeclared_callee_compiles() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.function(
            "main",
            "int",
            &[],
            &[b.ret(Some(b.call("missing", &[b.int(1)])))],
        )]);

        assert!(Compiler::compile_program(&program).is_ok());
    }

    #[test]
    fn void_call_statement_is_not_popped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.function("noop", "void", &[], &[]),
            b.function("one", "int", &[], &[b.ret(Some(b.int(1)))]),
            b.function(
                "main",
                "void",
                &[],
                &[
                    b.expr_stmt(b.call("noop", &[])),
                    b.expr_stmt(b.call("one", &[])),
                ],
            ),
        ]);

        let compiled = Compiler::compile_program(&program).unwrap();
        let main = compiled.functions.resolve("main").unwrap().address;
        let ops: Vec<OpCode> = compiled.bytecode.opcodes()[main..compiled.init_address].to_vec();
        assert_eq!(
            ops,
            vec![
                OpCode::CallFunc,
                OpCode::CallFunc,
                OpCode::Pop,
                OpCode::Return
            ]
        );
    }

    #[test]
    fn unknown_parameter_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.function(
            "f",
            "void",
            &[b.param("Vector", "v")],
            &[],
        )]);

        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::UnknownType {
                name: "Vector".to_string()
            }
        );
    }

    #[test]
    fn global_statements_follow_functions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.stmt(b.var_decl("int", "counter", Some(b.int(3)))),
            b.function("main", "int", &[], &[b.ret(Some(b.ident("counter")))]),
        ]);

        let compiled = Compiler::compile_program(&program).unwrap();
        assert_eq!(compiled.init_address, 3);
        assert_eq!(compiled.bytecode[3].operand, Value::Int(3));
        assert_eq!(compiled.bytecode[4].opcode, OpCode::DefineVar);
        assert_eq!(compiled.bytecode[5].opcode, OpCode::Return);
    }

    #[test]
    fn return_must_match_declared_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let program = b.program(&[b.function("v", "void", &[], &[b.ret(Some(b.int(99)))])]);
        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::ReturnTypeMismatch {
                function: "v".to_string(),
                declared: "void".to_string(),
                found: "a value",
            }
        );

        let program = b.program(&[b.function("f", "int", &[], &[b.ret(None)])]);
        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::ReturnTypeMismatch {
                function: "f".to_string(),
                declared: "int".to_string(),
                found: "nothing",
            }
        );
    }

    #[test]
    fn non_void_body_must_return_on_every_path() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let program = b.program(&[b.function("f", "int", &[], &[])]);
        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::MissingReturn {
                function: "f".to_string()
            }
        );

        let program = b.program(&[b.function(
            "g",
            "int",
            &[b.param("bool", "c")],
            &[b.if_stmt(b.ident("c"), b.ret(Some(b.int(1))), None)],
        )]);
        assert_eq!(
            Compiler::compile_program(&program).unwrap_err(),
            CompileError::MissingReturn {
                function: "g".to_string()
            }
        );
    }

    #[test]
    fn void_call_cannot_be_a_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let noop = b.function("noop", "void", &[], &[]);
        let add = b.function(
            "add",
            "int",
            &[b.param("int", "a"), b.param("int", "b")],
            &[b.ret(Some(b.binary(b.ident("a"), BinaryOp::Add, b.ident("b"))))],
        );
        let void_value = CompileError::VoidValue {
            function: "noop".to_string(),
        };

        let uses = [
            b.ret(Some(b.call("add", &[b.call("noop", &[]), b.int(5)]))),
            b.ret(Some(b.binary(b.call("noop", &[]), BinaryOp::Add, b.int(1)))),
            b.var_decl("int", "x", Some(b.call("noop", &[]))),
        ];
        for stmt in uses {
            let program = b.program(&[
                noop,
                add,
                b.function("main", "int", &[], &[stmt, b.ret(Some(b.int(0)))]),
            ]);
            assert_eq!(
                Compiler::compile_program(&program).unwrap_err(),
                void_value
            );
        }
    }
}
