//! VM configuration.
//!
//! Defines runtime limits for the virtual machine. Configuration specifies
//! constraints only; enforcement is handled by the VM.

/// Default maximum interpreted call depth.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Default maximum operand stack size.
pub const DEFAULT_MAX_STACK_SIZE: usize = 4096;

/// VM configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum call depth (recursion limit). Each interpreted call also nests
    /// one native call of the execute loop, so this bounds host stack use.
    pub max_call_depth: usize,

    /// Maximum number of values on the operand stack.
    pub max_stack_size: usize,

    /// Emit a `trace!` event for every executed instruction.
    pub trace_instructions: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            trace_instructions: false,
        }
    }
}

impl VmConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_stack_size(mut self, size: usize) -> Self {
        self.max_stack_size = size;
        self
    }

    pub fn with_trace_instructions(mut self, enabled: bool) -> Self {
        self.trace_instructions = enabled;
        self
    }
}
