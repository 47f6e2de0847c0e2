//! The program tree handed to the compiler.

use rustc_hash::FxHashMap;

use crate::decl::{FunctionDecl, Item, StructDecl};
use crate::stmt::Stmt;

/// A complete program.
///
/// All nodes live in an arena. `items` keeps source order; the function and
/// struct maps hold handles to the same arena nodes for lookup by name. A name
/// declared twice maps to its last declaration.
#[derive(Debug, Clone)]
pub struct Program<'ast> {
    items: &'ast [Item<'ast>],
    functions: FxHashMap<&'ast str, &'ast FunctionDecl<'ast>>,
    structs: FxHashMap<&'ast str, &'ast StructDecl<'ast>>,
}

impl<'ast> Program<'ast> {
    /// Build a program from its top-level items, indexing declarations by name.
    pub fn new(items: &'ast [Item<'ast>]) -> Self {
        let mut functions = FxHashMap::default();
        let mut structs = FxHashMap::default();
        for item in items {
            match item {
                Item::Function(decl) => {
                    functions.insert(decl.name, *decl);
                }
                Item::Struct(decl) => {
                    structs.insert(decl.name, *decl);
                }
                Item::Stmt(_) => {}
            }
        }
        Self {
            items,
            functions,
            structs,
        }
    }

    /// Top-level items in source order.
    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    /// Look up a function declaration.
    pub fn function(&self, name: &str) -> Option<&'ast FunctionDecl<'ast>> {
        self.functions.get(name).copied()
    }

    /// Look up a struct declaration.
    pub fn struct_decl(&self, name: &str) -> Option<&'ast StructDecl<'ast>> {
        self.structs.get(name).copied()
    }

    /// All function declarations, keyed by name.
    pub fn functions(&self) -> &FxHashMap<&'ast str, &'ast FunctionDecl<'ast>> {
        &self.functions
    }

    /// All struct declarations, keyed by name.
    pub fn structs(&self) -> &FxHashMap<&'ast str, &'ast StructDecl<'ast>> {
        &self.structs
    }

    /// Top-level statements that are not declarations, in source order.
    pub fn global_stmts(&self) -> impl Iterator<Item = &'ast Stmt<'ast>> + 'ast {
        self.items.iter().filter_map(|item| match item {
            Item::Stmt(stmt) => Some(stmt),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AstBuilder;
    use bumpalo::Bump;

    #[test]
    fn indexes_declarations_by_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.struct_decl("Point", &[("int", "x"), ("int", "y")]),
            b.function("main", "int", &[], &[b.ret(Some(b.int(1)))]),
            b.stmt(b.var_decl("int", "g", None)),
        ]);

        assert_eq!(program.items().len(), 3);
        assert_eq!(program.function("main").map(|f| f.name), Some("main"));
        assert_eq!(program.struct_decl("Point").map(|s| s.fields.len()), Some(2));
        assert!(program.function("Point").is_none());
        assert_eq!(program.global_stmts().count(), 1);
    }

    #[test]
    fn later_declaration_wins() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[
            b.function("f", "int", &[], &[b.ret(Some(b.int(1)))]),
            b.function("f", "int", &[], &[b.ret(Some(b.int(2)))]),
        ]);

        assert_eq!(program.functions().len(), 1);
        let f = program.function("f").unwrap();
        assert_eq!(
            f.body.stmts[0],
            Stmt::Return(crate::stmt::ReturnStmt {
                value: Some(&crate::expr::Expr::Literal(crate::expr::Literal::Int(2)))
            })
        );
    }
}
