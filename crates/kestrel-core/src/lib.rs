//! Core types shared by the kestrel compiler and virtual machine.
//!
//! This crate provides:
//! - [`Value`]: the tagged runtime value and its type tag [`ValueType`]
//! - [`RuntimeStruct`]: struct instances as field-name to value maps
//! - [`ArithmeticOp`]: binary operator semantics over values
//! - The error hierarchy rooted at [`KestrelError`]
//!
//! # Example
//!
//! ```
//! use kestrel_core::{ArithmeticOp, Value};
//!
//! let sum = Value::Int(5).binary_op(ArithmeticOp::Add, &Value::Int(6)).unwrap();
//! assert_eq!(sum, Value::Int(11));
//! ```

pub mod error;
pub mod operator;
pub mod runtime_struct;
pub mod value;

pub use error::{CompileError, KestrelError, RuntimeError};
pub use operator::{ArithmeticOp, apply, can_perform};
pub use runtime_struct::RuntimeStruct;
pub use value::{Value, ValueType};
