//! The program-wide instruction array.
//!
//! A [`Bytecode`] grows by appending during compilation and is then read by
//! absolute address. Jumps are relative, so appending one program to another
//! needs no relocation.

use std::fmt;
use std::ops::{AddAssign, Index};

use super::{Instruction, OpCode};

/// An ordered, append-only sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    instructions: Vec<Instruction>,
}

impl Bytecode {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Append every instruction of `other`, in order.
    pub fn append(&mut self, other: Bytecode) {
        self.instructions.extend(other.instructions);
    }

    /// Get the instruction at an absolute address.
    pub fn get(&self, address: usize) -> Option<&Instruction> {
        self.instructions.get(address)
    }

    /// Get a mutable instruction, for patching jump offsets.
    pub(crate) fn get_mut(&mut self, address: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(address)
    }

    /// Number of instructions; also the address of the next push.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate over instructions in address order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// All instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Extract all opcodes, dropping operands and tags.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions.iter().map(|i| i.opcode).collect()
    }

    /// Check if this program contains exactly the given opcode sequence.
    ///
    /// Panics with both sequences if they differ.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }
}

impl AddAssign<Instruction> for Bytecode {
    fn add_assign(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}

impl AddAssign<Bytecode> for Bytecode {
    fn add_assign(&mut self, other: Bytecode) {
        self.append(other);
    }
}

impl Index<usize> for Bytecode {
    type Output = Instruction;

    fn index(&self, address: usize) -> &Instruction {
        &self.instructions[address]
    }
}

impl<'a> IntoIterator for &'a Bytecode {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Instruction> for Bytecode {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:04} {}", address, instruction)?;
        }
        Ok(())
    }
}
