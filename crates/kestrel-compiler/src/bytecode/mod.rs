//! Bytecode types for the kestrel compiler.
//!
//! - [`OpCode`] - The instruction set for the VM
//! - [`Instruction`] - Opcode, operand value and debug tag
//! - [`Bytecode`] - The program-wide instruction array

mod instruction;
mod opcode;
mod program;

pub use instruction::Instruction;
pub use opcode::OpCode;
pub use program::Bytecode;
