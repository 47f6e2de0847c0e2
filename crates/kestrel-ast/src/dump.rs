//! Indented tree dumps of program nodes.
//!
//! Every node kind implements `Display` by printing its kind name and payload
//! on one line, then its children indented by two spaces. Dumps are for
//! tracing only.

use std::fmt::{self, Display, Formatter};

use crate::decl::{FunctionDecl, Item, StructDecl};
use crate::expr::{Expr, Literal};
use crate::program::Program;
use crate::stmt::Stmt;

fn line(f: &mut Formatter<'_>, depth: usize, args: fmt::Arguments<'_>) -> fmt::Result {
    writeln!(f, "{:width$}{}", "", args, width = depth * 2)
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr<'_>, depth: usize) -> fmt::Result {
    let kind = expr.kind_name();
    match expr {
        Expr::Literal(lit) => line(f, depth, format_args!("{} {}", kind, lit)),
        Expr::Ident(ident) => line(f, depth, format_args!("{} {}", kind, ident.name)),
        Expr::Binary(bin) => {
            line(f, depth, format_args!("{} {}", kind, bin.op))?;
            write_expr(f, bin.left, depth + 1)?;
            write_expr(f, bin.right, depth + 1)
        }
        Expr::Call(call) => {
            line(f, depth, format_args!("{} {}", kind, call.callee))?;
            for arg in call.args {
                write_expr(f, arg, depth + 1)?;
            }
            Ok(())
        }
        Expr::Member(member) => {
            line(f, depth, format_args!("{} .{}", kind, member.member))?;
            write_expr(f, member.object, depth + 1)
        }
    }
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt<'_>, depth: usize) -> fmt::Result {
    let kind = stmt.kind_name();
    match stmt {
        Stmt::Expr(expr) => {
            line(f, depth, format_args!("{}", kind))?;
            write_expr(f, expr, depth + 1)
        }
        Stmt::VarDecl(decl) => {
            line(f, depth, format_args!("{} {} {}", kind, decl.ty, decl.name))?;
            match decl.init {
                Some(init) => write_expr(f, init, depth + 1),
                None => Ok(()),
            }
        }
        Stmt::Assign(assign) => {
            line(f, depth, format_args!("{}", kind))?;
            write_expr(f, assign.target, depth + 1)?;
            write_expr(f, assign.value, depth + 1)
        }
        Stmt::Return(ret) => {
            line(f, depth, format_args!("{}", kind))?;
            match ret.value {
                Some(value) => write_expr(f, value, depth + 1),
                None => Ok(()),
            }
        }
        Stmt::Block(block) => {
            line(f, depth, format_args!("{}", kind))?;
            for stmt in block.stmts {
                write_stmt(f, stmt, depth + 1)?;
            }
            Ok(())
        }
        Stmt::If(if_stmt) => {
            line(f, depth, format_args!("{}", kind))?;
            write_expr(f, if_stmt.condition, depth + 1)?;
            write_stmt(f, if_stmt.then_stmt, depth + 1)?;
            if let Some(else_stmt) = if_stmt.else_stmt {
                line(f, depth, format_args!("Else"))?;
                write_stmt(f, else_stmt, depth + 1)?;
            }
            Ok(())
        }
    }
}

fn write_function(f: &mut Formatter<'_>, decl: &FunctionDecl<'_>, depth: usize) -> fmt::Result {
    let params = decl
        .params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ");
    line(
        f,
        depth,
        format_args!(
            "FunctionDeclaration {}({}) -> {}",
            decl.name, params, decl.return_type
        ),
    )?;
    for stmt in decl.body.stmts {
        write_stmt(f, stmt, depth + 1)?;
    }
    Ok(())
}

fn write_struct(f: &mut Formatter<'_>, decl: &StructDecl<'_>, depth: usize) -> fmt::Result {
    line(f, depth, format_args!("StructDeclaration {}", decl.name))?;
    for field in decl.fields {
        line(f, depth + 1, format_args!("Field {} {}", field.ty, field.name))?;
    }
    Ok(())
}

fn write_item(f: &mut Formatter<'_>, item: &Item<'_>, depth: usize) -> fmt::Result {
    match item {
        Item::Function(decl) => write_function(f, decl, depth),
        Item::Struct(decl) => write_struct(f, decl, depth),
        Item::Stmt(stmt) => write_stmt(f, stmt, depth),
    }
}

impl Display for Literal<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

impl Display for Stmt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl Display for Item<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_item(f, self, 0)
    }
}

impl Display for Program<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        line(f, 0, format_args!("Program"))?;
        for item in self.items() {
            write_item(f, item, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::AstBuilder;
    use crate::ops::BinaryOp;
    use bumpalo::Bump;

    #[test]
    fn dumps_function_tree() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(&[b.function(
            "add",
            "int",
            &[b.param("int", "a"), b.param("int", "b")],
            &[b.ret(Some(b.binary(b.ident("a"), BinaryOp::Add, b.ident("b"))))],
        )]);

        let expected = "\
Program
  FunctionDeclaration add(int a, int b) -> int
    Return
      BinaryOperation +
        Identifier a
        Identifier b
";
        assert_eq!(program.to_string(), expected);
    }

    #[test]
    fn dumps_struct_and_members() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let item = b.struct_decl("Point", &[("int", "x"), ("float", "y")]);
        assert_eq!(
            item.to_string(),
            "StructDeclaration Point\n  Field int x\n  Field float y\n"
        );

        let stmt = b.assign(b.path("p", &["x"]), b.string("hi"));
        assert_eq!(
            stmt.to_string(),
            "Assignment\n  MemberAccess .x\n    Identifier p\n  Literal \"hi\"\n"
        );
    }

    #[test]
    fn dumps_if_else() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stmt = b.if_stmt(
            b.bool(true),
            b.ret(Some(b.int(1))),
            Some(b.ret(Some(b.float(2.0)))),
        );
        assert_eq!(
            stmt.to_string(),
            "If\n  Literal true\n  Return\n    Literal 1\nElse\n  Return\n    Literal 2.0\n"
        );
    }
}
