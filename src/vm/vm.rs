use std::ops::ControlFlow;

use kestrel_compiler::function_compiler::GLOBAL_TAG;
use kestrel_compiler::{CompiledProgram, FunctionEntry, Instruction, OpCode};
use kestrel_core::{ArithmeticOp, RuntimeError, Value};
use tracing::{debug, instrument, trace};

use super::frame::{CallFrame, CallStack};
use super::scope::{ScopeId, Scopes};
use super::stack::OperandStack;
use crate::config::VmConfig;

/// Name of the function execution starts in.
pub const ENTRY_POINT: &str = "main";

type Result<T> = std::result::Result<T, RuntimeError>;

/// Stack-based virtual machine over a compiled program.
///
/// Each interpreted call runs a nested invocation of the fetch-execute loop,
/// so interpreted call depth maps one-to-one onto host stack depth; the depth
/// is capped by [`VmConfig::max_call_depth`].
pub struct Vm<'p, 'ast> {
    program: &'p CompiledProgram<'ast>,
    config: VmConfig,
    pc: usize,
    stack: OperandStack,
    calls: CallStack,
    scopes: Scopes,
}

impl<'p, 'ast> Vm<'p, 'ast> {
    pub fn new(program: &'p CompiledProgram<'ast>, config: VmConfig) -> Self {
        let stack = OperandStack::new(config.max_stack_size);
        Self {
            program,
            config,
            pc: 0,
            stack,
            calls: CallStack::new(),
            scopes: Scopes::new(),
        }
    }

    fn reset(&mut self) {
        self.pc = 0;
        self.stack.clear();
        self.calls.clear();
        self.scopes = Scopes::new();
    }

    /// Run the global initializer, then `main`.
    ///
    /// Returns the value `main` returned, or `None` if it returned nothing.
    #[instrument(skip_all, name = "vm_execute")]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute(&mut self) -> Result<Option<Value>> {
        self.reset();
        let program = self.program;
        let main = *program
            .functions
            .resolve(ENTRY_POINT)
            .ok_or(RuntimeError::MainNotFound)?;

        debug!(
            instructions = program.bytecode.len(),
            main = main.address,
            init = program.init_address,
            "execution started"
        );

        let halt = program.bytecode.len();
        let outcome = self
            .invoke(GLOBAL_TAG, program.init_address, ScopeId::GLOBAL, halt)
            .and_then(|()| self.call(main, halt));
        if let Err(err) = outcome {
            debug!(error = %err, backtrace = ?self.calls.backtrace(), "execution failed");
            return Err(err);
        }

        let result = match self.stack.len() {
            0 => None,
            1 => Some(self.stack.pop()?),
            remaining => return Err(RuntimeError::UnbalancedStack { remaining }),
        };
        debug!(result = ?result, "execution finished");
        Ok(result)
    }

    /// Bind arguments into a fresh scope and run the callee.
    ///
    /// The callee's scope is a child of its definition scope. Functions are
    /// only declared at top level, so that is always the global scope.
    fn call(&mut self, entry: FunctionEntry<'ast>, return_address: usize) -> Result<()> {
        if self.calls.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::RecursionTooDeep {
                depth: self.config.max_call_depth,
            });
        }

        // Arguments were pushed in declaration order.
        let arity = entry.decl.arity();
        let mut args = Vec::with_capacity(arity);
        for _ in 0..arity {
            args.push(self.stack.pop()?);
        }

        let scope = self.scopes.create_child(ScopeId::GLOBAL);
        for (name, value) in entry.param_names().rev().zip(args) {
            self.scopes.define(scope, name, value);
        }

        trace!(
            function = entry.name(),
            depth = self.calls.depth() + 1,
            "call"
        );
        self.invoke(entry.name(), entry.address, scope, return_address)
    }

    /// Push a frame, run until it returns, then pop it.
    ///
    /// On error the frame stays pushed, so the call stack still describes
    /// where execution stopped. The next `execute` resets it.
    fn invoke(
        &mut self,
        function: &str,
        address: usize,
        scope: ScopeId,
        return_address: usize,
    ) -> Result<()> {
        self.calls
            .push(CallFrame::new(function, scope, return_address));
        self.pc = address;

        self.run()?;

        if let Some(frame) = self.calls.pop() {
            self.scopes.release(frame.scope);
            self.pc = frame.return_address;
        }
        trace!(function, "return");
        Ok(())
    }

    /// The fetch-execute loop for one call.
    fn run(&mut self) -> Result<()> {
        let program = self.program;
        loop {
            let pc = self.pc;
            let instruction = program
                .bytecode
                .get(pc)
                .ok_or(RuntimeError::ProgramCounterOutOfRange { pc })?;
            self.pc += 1;

            if self.config.trace_instructions {
                trace!(
                    pc,
                    opcode = %instruction.opcode,
                    operand = %instruction.operand,
                    tag = %instruction.debug_tag,
                    depth = self.calls.depth(),
                    "execute"
                );
            }

            if self.step(instruction)?.is_break() {
                return Ok(());
            }
        }
    }

    fn step(&mut self, instruction: &'p Instruction) -> Result<ControlFlow<()>> {
        let operand = &instruction.operand;
        match instruction.opcode {
            OpCode::LoadConst | OpCode::NewStruct => self.stack.push(operand.clone())?,
            OpCode::Pop => {
                self.stack.pop()?;
            }

            OpCode::Add => self.binary(ArithmeticOp::Add)?,
            OpCode::Sub => self.binary(ArithmeticOp::Sub)?,
            OpCode::Mul => self.binary(ArithmeticOp::Mul)?,
            OpCode::Div => self.binary(ArithmeticOp::Div)?,
            OpCode::Mod => self.binary(ArithmeticOp::Mod)?,
            OpCode::Eq => self.binary(ArithmeticOp::Eq)?,
            OpCode::Neq => self.binary(ArithmeticOp::Neq)?,
            OpCode::Lt => self.binary(ArithmeticOp::Lt)?,
            OpCode::Lte => self.binary(ArithmeticOp::Lte)?,
            OpCode::Gt => self.binary(ArithmeticOp::Gt)?,
            OpCode::Gte => self.binary(ArithmeticOp::Gte)?,

            OpCode::LoadVar => {
                let value = self
                    .scopes
                    .resolve(self.current_scope(), operand.as_str()?)?
                    .clone();
                self.stack.push(value)?;
            }
            OpCode::StoreVar => {
                let value = self.stack.pop()?;
                let scope = self.current_scope();
                *self.scopes.resolve_mut(scope, operand.as_str()?)? = value;
            }
            OpCode::DefineVar => {
                let value = self.stack.pop()?;
                let scope = self.current_scope();
                self.scopes.define(scope, operand.as_str()?, value);
            }
            OpCode::StoreField => {
                let mut target = self.stack.pop()?.into_struct()?;
                let value = self.stack.pop()?;
                target.set(operand.as_str()?, value);
                self.stack.push(Value::Struct(target))?;
            }
            OpCode::LoadField => {
                let target = self.stack.pop()?.into_struct()?;
                let value = target.field(operand.as_str()?)?.clone();
                self.stack.push(value)?;
            }

            OpCode::Jump => self.jump(operand)?,
            OpCode::JumpIfFalse => {
                let condition = self.stack.pop()?;
                if !truthy(&condition)? {
                    self.jump(operand)?;
                }
            }
            OpCode::CallFunc => {
                let name = operand.as_str()?;
                let entry = *self
                    .program
                    .functions
                    .resolve(name)
                    .ok_or_else(|| RuntimeError::FunctionNotFound {
                        name: name.to_string(),
                    })?;
                self.call(entry, self.pc)?;
            }
            OpCode::ReturnValue => {
                if self.stack.is_empty() {
                    return Err(RuntimeError::StackUnderflow);
                }
                return Ok(ControlFlow::Break(()));
            }
            OpCode::Return => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Pop right, pop left, push `left op right`.
    fn binary(&mut self, op: ArithmeticOp) -> Result<()> {
        let rhs = self.stack.pop()?;
        let lhs = self.stack.pop()?;
        self.stack.push(lhs.binary_op(op, &rhs)?)
    }

    /// Move the program counter by a relative offset.
    fn jump(&mut self, offset: &Value) -> Result<()> {
        let target = (self.pc as i64).saturating_add(*offset.as_int()?);
        if target < 0 || target as usize >= self.program.bytecode.len() {
            return Err(RuntimeError::InvalidJumpTarget { address: target });
        }
        self.pc = target as usize;
        Ok(())
    }

    fn current_scope(&self) -> ScopeId {
        self.calls
            .current()
            .map(|frame| frame.scope)
            .unwrap_or(ScopeId::GLOBAL)
    }

    /// The operand stack.
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// Number of active call frames.
    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    /// Active function names, outermost first.
    ///
    /// Empty after a successful run; after a failed one it names the calls
    /// that were active when the error was raised.
    pub fn backtrace(&self) -> Vec<&str> {
        self.calls.backtrace()
    }

    /// Look up a global variable.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.scopes
            .get(ScopeId::GLOBAL)
            .and_then(|table| table.get_local(name))
    }
}

/// Conditions are Bool, or Int with non-zero meaning true.
fn truthy(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        other => Err(RuntimeError::type_mismatch("Bool", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use kestrel_ast::{AstBuilder, FunctionDecl, Item};
    use kestrel_compiler::{Bytecode, FunctionTable};
    use kestrel_core::RuntimeStruct;

    fn decl<'ast>(item: Item<'ast>) -> &'ast FunctionDecl<'ast> {
        match item {
            Item::Function(decl) => decl,
            other => panic!("expected a function, got {}", other.kind_name()),
        }
    }

    /// A program whose only function is `main` with the given body, followed
    /// by an empty initializer.
    fn hand_built<'ast>(
        main: &'ast FunctionDecl<'ast>,
        body: Vec<Instruction>,
    ) -> CompiledProgram<'ast> {
        let mut bytecode: Bytecode = body.into_iter().collect();
        let init_address = bytecode.len();
        bytecode += Instruction::bare(OpCode::Return, "global:end");

        let mut functions = FunctionTable::new();
        functions.define(main, 0);
        CompiledProgram {
            bytecode,
            functions,
            init_address,
        }
    }

    #[test]
    fn store_then_load_field_round_trips() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = decl(b.function("main", "int", &[], &[]));
        let program = hand_built(
            main,
            vec![
                Instruction::new(OpCode::LoadConst, Value::Int(42), "main"),
                Instruction::new(OpCode::NewStruct, Value::Struct(RuntimeStruct::new()), "main"),
                Instruction::named(OpCode::StoreField, "a", "main"),
                Instruction::named(OpCode::LoadField, "a", "main"),
                Instruction::bare(OpCode::ReturnValue, "main"),
            ],
        );

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(vm.execute(), Ok(Some(Value::Int(42))));
        assert!(vm.stack().is_empty());
        assert_eq!(vm.call_depth(), 0);
    }

    #[test]
    fn missing_arguments_underflow() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let add = decl(b.function(
            "add",
            "int",
            &[b.param("int", "a"), b.param("int", "b")],
            &[],
        ));
        let main = decl(b.function("main", "int", &[], &[]));

        let mut program = hand_built(
            main,
            vec![
                Instruction::new(OpCode::LoadConst, Value::Int(5), "main"),
                Instruction::named(OpCode::CallFunc, "add", "main"),
                Instruction::bare(OpCode::ReturnValue, "main"),
            ],
        );
        program.functions.define(add, program.init_address);

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(vm.execute(), Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn missing_main_runs_nothing() {
        let program = CompiledProgram {
            bytecode: Bytecode::new(),
            functions: FunctionTable::new(),
            init_address: 0,
        };
        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(vm.execute(), Err(RuntimeError::MainNotFound));
    }

    #[test]
    fn jump_out_of_program_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = decl(b.function("main", "void", &[], &[]));
        let program = hand_built(
            main,
            vec![Instruction::new(OpCode::Jump, Value::Int(-5), "main")],
        );

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(
            vm.execute(),
            Err(RuntimeError::InvalidJumpTarget { address: -4 })
        );
    }

    #[test]
    fn non_boolean_condition_is_a_type_mismatch() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = decl(b.function("main", "void", &[], &[]));
        let program = hand_built(
            main,
            vec![
                Instruction::new(OpCode::LoadConst, Value::from("yes"), "main"),
                Instruction::new(OpCode::JumpIfFalse, Value::Int(0), "main"),
                Instruction::bare(OpCode::Return, "main"),
            ],
        );

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(
            vm.execute(),
            Err(RuntimeError::TypeMismatch {
                expected: "Bool".to_string(),
                actual: "String".to_string(),
            })
        );
    }

    #[test]
    fn running_off_the_end() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = decl(b.function("main", "void", &[], &[]));
        let program = CompiledProgram {
            bytecode: [Instruction::new(OpCode::LoadConst, Value::Int(1), "main")]
                .into_iter()
                .collect(),
            functions: {
                let mut functions = FunctionTable::new();
                functions.define(main, 0);
                functions
            },
            init_address: 0,
        };

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(
            vm.execute(),
            Err(RuntimeError::ProgramCounterOutOfRange { pc: 1 })
        );
    }

    #[test]
    fn failed_run_keeps_the_call_chain() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = decl(b.function("main", "int", &[], &[]));
        let boom = decl(b.function("boom", "int", &[], &[]));

        let mut program = hand_built(
            main,
            vec![
                Instruction::named(OpCode::CallFunc, "boom", "main"),
                Instruction::bare(OpCode::ReturnValue, "main"),
                Instruction::named(OpCode::LoadVar, "nope", "boom"),
                Instruction::bare(OpCode::ReturnValue, "boom"),
            ],
        );
        program.functions.define(boom, 2);

        let mut vm = Vm::new(&program, VmConfig::default());
        assert_eq!(
            vm.execute(),
            Err(RuntimeError::UndefinedVariable {
                name: "nope".to_string()
            })
        );
        assert_eq!(vm.backtrace(), vec!["main", "boom"]);
    }

    #[test]
    fn truthiness() {
        assert_eq!(truthy(&Value::Bool(false)), Ok(false));
        assert_eq!(truthy(&Value::Int(-1)), Ok(true));
        assert_eq!(truthy(&Value::Int(0)), Ok(false));
        assert!(truthy(&Value::Float(1.0)).is_err());
    }
}
