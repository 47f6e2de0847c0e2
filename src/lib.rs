//! Kestrel
//!
//! A bytecode compiler and stack virtual machine for a small imperative
//! language with functions, structs and dynamically tagged values.
//!
//! ## Pipeline
//!
//! ```text
//! Program tree ─► Compiler ─► CompiledProgram ─► Vm ─► Option<Value>
//!  (kestrel-ast)  (kestrel-compiler)            (this crate)
//! ```
//!
//! Parsing is not part of this workspace. Trees are built with
//! [`AstBuilder`] or handed over by a host parser.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use kestrel::{AstBuilder, BinaryOp, Value, VmConfig};
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
//!
//! let result = kestrel::run(&program, VmConfig::default()).unwrap();
//! assert_eq!(result, Some(Value::Int(11)));
//! ```

pub mod config;
pub mod vm;

pub use config::VmConfig;
pub use vm::{
    CallFrame, CallStack, ENTRY_POINT, OperandStack, ScopeId, Scopes, SymbolTable, Vm,
};

pub use kestrel_ast::{AstBuilder, BinaryOp, Expr, Item, Program};
pub use kestrel_compiler::{
    Bytecode, CompiledProgram, Compiler, FunctionTable, Instruction, OpCode,
};
pub use kestrel_core::{
    ArithmeticOp, CompileError, KestrelError, RuntimeError, RuntimeStruct, Value, ValueType,
};

/// Compile `program` and run it to completion.
///
/// Returns what `main` returned, or `None` for a void `main`.
pub fn run(program: &Program<'_>, config: VmConfig) -> Result<Option<Value>, KestrelError> {
    let compiled = Compiler::compile_program(program)?;
    let result = Vm::new(&compiled, config).execute()?;
    Ok(result)
}
