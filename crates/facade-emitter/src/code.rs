//! Member Code Blocks
//!
//! Member bodies are opaque to the assembly engine: the code-generation
//! backend emits instructions into a `CodeBlock`, and the engine only
//! performs the shape check required by finalization. A block is
//! *terminated* once its last instruction is a return; an empty block is
//! auto-completed with a void return, while a non-empty unterminated
//! block is a structural validation error.

use crate::error::{EmitError, EmitResult};

/// Opcode constants understood by the proxy runtime
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const LOAD_THIS: u8 = 0x01;
    pub const LOAD_ARG: u8 = 0x02;
    pub const LOAD_NULL: u8 = 0x03;

    // Field access
    pub const LOAD_FIELD: u8 = 0x10;
    pub const STORE_FIELD: u8 = 0x11;

    // Calls
    pub const CALL: u8 = 0x20;
    pub const CALL_BASE: u8 = 0x21;
    pub const INVOKE_INTERCEPTOR: u8 = 0x22;

    // Returns
    pub const RETURN: u8 = 0x30;
    pub const RETURN_VOID: u8 = 0x31;
}

/// An opaque member body under construction
#[derive(Debug, Default, Clone)]
pub struct CodeBlock {
    bytecode: Vec<u8>,
    terminated: bool,
}

impl CodeBlock {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a single instruction
    pub fn emit(&mut self, op: u8) {
        self.bytecode.push(op);
        self.terminated = matches!(op, opcode::RETURN | opcode::RETURN_VOID);
    }

    /// Emit an instruction with a one-byte operand
    pub fn emit_with(&mut self, op: u8, operand: u8) {
        self.bytecode.push(op);
        self.bytecode.push(operand);
        self.terminated = false;
    }

    /// Emit a value-returning terminator
    pub fn emit_return(&mut self) {
        self.emit(opcode::RETURN);
    }

    /// Emit a void terminator
    pub fn emit_return_void(&mut self) {
        self.emit(opcode::RETURN_VOID);
    }

    /// Whether no instruction has been emitted yet
    pub fn is_empty(&self) -> bool {
        self.bytecode.is_empty()
    }

    /// Whether the block ends in a return instruction
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Emitted instruction stream
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Shape check run during finalization.
    ///
    /// An empty block is completed with a void return; a block that has
    /// instructions but no terminator is reported against `member`.
    pub fn ensure_valid(&mut self, member: &str) -> EmitResult<()> {
        if self.is_empty() {
            self.emit_return_void();
            return Ok(());
        }
        if !self.terminated {
            return Err(EmitError::InvalidCodeBlock {
                member: member.to_string(),
                reason: "code block is not terminated by a return".to_string(),
            });
        }
        Ok(())
    }
}
