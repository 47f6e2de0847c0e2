//! The stack virtual machine.

mod frame;
mod scope;
mod stack;
#[allow(clippy::module_inception)]
mod vm;

pub use frame::{CallFrame, CallStack};
pub use scope::{ScopeId, Scopes, SymbolTable};
pub use stack::OperandStack;
pub use vm::{ENTRY_POINT, Vm};
