//! Compiles one function body, or the global initializer, to bytecode.
//!
//! Parameters are not stored by the body: the VM binds them into the callee's
//! scope before jumping to the start address. Every body ends with an
//! implicit `RETURN`, so execution never falls through into the next body;
//! non-void functions are rejected if that implicit `RETURN` is reachable.

use kestrel_ast::{FunctionDecl, Program, Stmt};
use kestrel_core::CompileError;

use crate::bytecode::{Bytecode, OpCode};
use crate::emit::BytecodeEmitter;
use crate::return_checker::all_paths_return;
use crate::types::TypeResolver;

pub(crate) type Result<T> = std::result::Result<T, CompileError>;

/// Debug tag owner used for global statements.
pub const GLOBAL_TAG: &str = "global";

/// Compiles a single body.
pub struct FunctionCompiler<'c, 'ast> {
    /// Program being compiled, for callee lookups
    pub(crate) program: &'c Program<'ast>,
    /// Type names and struct prototypes
    pub(crate) types: &'c TypeResolver<'c, 'ast>,
    /// Bytecode emitter
    pub(crate) emitter: BytecodeEmitter,
    /// Function name, used as the debug tag prefix
    owner: &'c str,
    /// Enclosing function; `None` for global statements
    function: Option<&'c FunctionDecl<'ast>>,
}

impl<'c, 'ast> FunctionCompiler<'c, 'ast> {
    /// Create a compiler for a function body.
    pub fn for_function(
        program: &'c Program<'ast>,
        types: &'c TypeResolver<'c, 'ast>,
        decl: &'c FunctionDecl<'ast>,
    ) -> Self {
        Self {
            program,
            types,
            emitter: BytecodeEmitter::new(),
            owner: decl.name,
            function: Some(decl),
        }
    }

    /// Create a compiler for top-level statements.
    pub fn for_globals(program: &'c Program<'ast>, types: &'c TypeResolver<'c, 'ast>) -> Self {
        Self {
            program,
            types,
            emitter: BytecodeEmitter::new(),
            owner: GLOBAL_TAG,
            function: None,
        }
    }

    /// Compile a function: check its signature and return paths, then its body.
    pub fn compile_function(
        program: &'c Program<'ast>,
        types: &'c TypeResolver<'c, 'ast>,
        decl: &'c FunctionDecl<'ast>,
    ) -> Result<Bytecode> {
        types.check_return(decl.return_type)?;
        for param in decl.params {
            types.check(param.ty)?;
        }
        if decl.returns_value() && !all_paths_return(decl.body.stmts) {
            return Err(CompileError::MissingReturn {
                function: decl.name.to_string(),
            });
        }
        Self::for_function(program, types, decl).compile_body(decl.body.stmts)
    }

    /// Compile statements followed by the implicit `RETURN`.
    pub fn compile_body(mut self, stmts: &[Stmt<'ast>]) -> Result<Bytecode> {
        for stmt in stmts {
            self.compile_stmt(stmt)?;
        }
        self.tag("end");
        self.emitter.emit(OpCode::Return);
        Ok(self.emitter.finish())
    }

    /// Tag subsequent instructions with `owner:construct`.
    pub(crate) fn tag(&mut self, construct: &str) {
        self.emitter.set_tag(format!("{}:{}", self.owner, construct));
    }

    /// The function being compiled, if any.
    pub(crate) fn function(&self) -> Option<&'c FunctionDecl<'ast>> {
        self.function
    }
}
