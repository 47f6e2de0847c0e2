//! Unified error types for kestrel.
//!
//! ## Error Hierarchy
//!
//! ```text
//! KestrelError (top-level wrapper)
//! ├── CompileError  - AST-to-bytecode lowering errors
//! └── RuntimeError  - Value operations and VM execution errors
//! ```
//!
//! Lexing and parsing happen outside this workspace, so there is no lexer or
//! parser variant here. Every condition in both enums is fatal: compilation
//! stops at the first `CompileError` and execution stops at the first
//! `RuntimeError`.

use thiserror::Error;

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors raised while lowering a program tree to bytecode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A binary operator has no corresponding opcode.
    #[error("unsupported binary operator '{op}'")]
    UnsupportedOperator {
        /// The operator symbol.
        op: String,
    },

    /// A node kind cannot appear at this position.
    #[error("unsupported {kind} node in {context}")]
    UnsupportedNode {
        /// Kind name of the offending node.
        kind: &'static str,
        /// Where the node was found (e.g. "assignment target").
        context: &'static str,
    },

    /// A declared type name is neither builtin nor a declared struct.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// The type name that wasn't found.
        name: String,
    },

    /// A call passes the wrong number of arguments to a declared function.
    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        /// The called function.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Number of arguments at the call site.
        found: usize,
    },

    /// A struct contains itself by value.
    #[error("struct '{name}' contains itself")]
    RecursiveStruct {
        /// The struct whose layout is infinite.
        name: String,
    },

    /// A `return` disagrees with the function's declared return type.
    #[error("function '{function}' is declared '{declared}' but returns {found}")]
    ReturnTypeMismatch {
        /// The enclosing function.
        function: String,
        /// Declared return type name.
        declared: String,
        /// What the return statement supplies ("a value" or "nothing").
        found: &'static str,
    },

    /// A non-void function can reach the end of its body.
    #[error("function '{function}' does not return a value on every path")]
    MissingReturn {
        /// The function.
        function: String,
    },

    /// A call to a void function is used where a value is needed.
    #[error("void function '{function}' used as a value")]
    VoidValue {
        /// The called function.
        function: String,
    },
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised by value operations and by the virtual machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A variable name is not bound anywhere in the scope chain.
    #[error("undefined variable '{name}'")]
    UndefinedVariable {
        /// The name that failed to resolve.
        name: String,
    },

    /// A struct field was read before it was ever stored.
    #[error("undefined field '{field}'")]
    UndefinedField {
        /// The field name.
        field: String,
    },

    /// A called function is not in the function table.
    #[error("function '{name}' not found")]
    FunctionNotFound {
        /// The function name.
        name: String,
    },

    /// A value had a different tag than required.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The actual type.
        actual: String,
    },

    /// An operator was applied to an operand pair it has no rule for.
    #[error("unsupported operation: {lhs} {op} {rhs}")]
    UnsupportedOperation {
        /// Operator symbol.
        op: &'static str,
        /// Type of the left operand.
        lhs: String,
        /// Type of the right operand.
        rhs: String,
    },

    /// A type name string did not name a value type.
    #[error("invalid type name '{name}'")]
    InvalidTypeName {
        /// The rejected type name.
        name: String,
    },

    /// Integer division or modulus by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A pop was attempted on an empty operand stack.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// The operand stack grew past its configured limit.
    #[error("operand stack overflow (limit {limit})")]
    StackOverflow {
        /// The configured maximum size.
        limit: usize,
    },

    /// Interpreted call depth exceeded the configured limit.
    #[error("recursion too deep (limit {depth})")]
    RecursionTooDeep {
        /// The configured maximum call depth.
        depth: usize,
    },

    /// The program has no `main` function.
    #[error("entry point 'main' not found")]
    MainNotFound,

    /// A jump resolved outside the program.
    #[error("invalid jump target {address}")]
    InvalidJumpTarget {
        /// The computed target address.
        address: i64,
    },

    /// Execution ran past the end of the program without returning.
    #[error("program counter {pc} out of range")]
    ProgramCounterOutOfRange {
        /// The offending program counter.
        pc: usize,
    },

    /// More than one value was left on the operand stack after `main`.
    #[error("operand stack not empty after main returned ({remaining} values left)")]
    UnbalancedStack {
        /// Values left on the stack, the result included.
        remaining: usize,
    },
}

impl RuntimeError {
    /// Convenience constructor for [`RuntimeError::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        RuntimeError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error produced by the kestrel pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KestrelError {
    /// Compilation failed.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Execution failed.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl KestrelError {
    /// Get the runtime error, if this is one.
    pub fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            KestrelError::Runtime(e) => Some(e),
            KestrelError::Compile(_) => None,
        }
    }

    /// Get the compile error, if this is one.
    pub fn as_compile(&self) -> Option<&CompileError> {
        match self {
            KestrelError::Compile(e) => Some(e),
            KestrelError::Runtime(_) => None,
        }
    }
}
