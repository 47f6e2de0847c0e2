//! Program tree for the kestrel toolchain.
//!
//! This crate provides the tree the compiler consumes:
//! - Expression, statement and declaration nodes, allocated in a `bumpalo` arena
//! - [`Program`]: ordered top-level items plus name-indexed function and struct maps
//! - [`AstBuilder`]: arena-backed node constructors
//! - Indented `Display` dumps of every node kind
//!
//! Lexing and parsing are not part of this workspace; a front end produces a
//! [`Program`] through the builder.

pub mod builder;
pub mod decl;
mod dump;
pub mod expr;
pub mod ops;
pub mod program;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use program::Program;
pub use stmt::*;
