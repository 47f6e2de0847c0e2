//! Type name resolution and struct prototypes.
//!
//! A type name is either builtin (`int`, `float`, `string`, `bool`, `struct`,
//! matched case-insensitively) or the name of a declared struct. Every
//! declared struct gets a prototype instance with each field set to the
//! default of its declared type; `NEW_STRUCT` pushes a copy of it.

use kestrel_ast::{Program, StructDecl};
use kestrel_core::{CompileError, RuntimeStruct, Value, ValueType};
use rustc_hash::FxHashMap;

/// Return type name for functions that return nothing.
pub const VOID: &str = "void";

/// Resolves type names against builtins and the program's struct declarations.
#[derive(Debug)]
pub struct TypeResolver<'a, 'ast> {
    program: &'a Program<'ast>,
    prototypes: FxHashMap<&'ast str, RuntimeStruct>,
}

impl<'a, 'ast> TypeResolver<'a, 'ast> {
    /// Validate every struct declaration and build its prototype.
    pub fn new(program: &'a Program<'ast>) -> Result<Self, CompileError> {
        let mut resolver = Self {
            program,
            prototypes: FxHashMap::default(),
        };
        let mut visiting = Vec::new();
        for item in program.items() {
            if let kestrel_ast::Item::Struct(decl) = item {
                // Duplicate names resolve to the last declaration.
                let decl = program.struct_decl(decl.name).unwrap_or(*decl);
                resolver.build_prototype(decl, &mut visiting)?;
            }
        }
        Ok(resolver)
    }

    fn build_prototype(
        &mut self,
        decl: &'ast StructDecl<'ast>,
        visiting: &mut Vec<&'ast str>,
    ) -> Result<RuntimeStruct, CompileError> {
        if let Some(prototype) = self.prototypes.get(decl.name) {
            return Ok(prototype.clone());
        }
        if visiting.contains(&decl.name) {
            return Err(CompileError::RecursiveStruct {
                name: decl.name.to_string(),
            });
        }

        visiting.push(decl.name);
        let mut prototype = RuntimeStruct::new();
        for field in decl.fields {
            let value = match ValueType::from_name(field.ty) {
                Some(ty) => ty.zero_value(),
                None => {
                    let nested = self.program.struct_decl(field.ty).ok_or_else(|| {
                        CompileError::UnknownType {
                            name: field.ty.to_string(),
                        }
                    })?;
                    Value::Struct(self.build_prototype(nested, visiting)?)
                }
            };
            prototype.set(field.name, value);
        }
        visiting.pop();

        self.prototypes.insert(decl.name, prototype.clone());
        Ok(prototype)
    }

    /// The default value of a type: the zero value of a builtin, or a copy of
    /// a struct prototype.
    pub fn default_value(&self, ty: &str) -> Result<Value, CompileError> {
        if let Some(builtin) = ValueType::from_name(ty) {
            return Ok(builtin.zero_value());
        }
        self.prototypes
            .get(ty)
            .cloned()
            .map(Value::Struct)
            .ok_or_else(|| CompileError::UnknownType {
                name: ty.to_string(),
            })
    }

    /// Check that a type name resolves.
    pub fn check(&self, ty: &str) -> Result<(), CompileError> {
        self.default_value(ty).map(|_| ())
    }

    /// Check that a return type name resolves or is `void`.
    pub fn check_return(&self, ty: &str) -> Result<(), CompileError> {
        if ty.eq_ignore_ascii_case(VOID) {
            return Ok(());
        }
        self.check(ty)
    }
}
