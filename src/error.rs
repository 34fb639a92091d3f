use std::path::PathBuf;

use thiserror::Error;

/// Fatal faults raised while the CPU executes. None of them are recoverable:
/// the dispatcher stops on the first one and hands it back to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CpuError {
    #[error("address {address:#04x} is outside of memory")]
    Address { address: usize },

    #[error("register index {index} is out of range (R0..R7)")]
    RegisterIndex { index: u8 },

    #[error("illegal instruction {opcode:#010b} at {pc:#04x}")]
    IllegalInstruction { opcode: u8, pc: usize },

    #[error("stack overflow at {pc:#04x}")]
    StackOverflow { pc: usize },

    #[error("stack underflow at {pc:#04x}")]
    StackUnderflow { pc: usize },

    #[error("unsupported ALU operation '{name}'")]
    UnsupportedOperation { name: String },
}

/// Errors from turning mnemonic source into a program image.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: {mnemonic} expects {expected} operand(s), got {actual}")]
    OperandCount {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: invalid register '{token}'")]
    InvalidRegister { line: usize, token: String },

    #[error("line {line}: invalid value '{token}'")]
    InvalidValue { line: usize, token: String },

    #[error("line {line}: empty label")]
    EmptyLabel { line: usize },

    #[error("line {line}: duplicate label '{label}'")]
    DuplicateLabel { line: usize, label: String },
}

/// Errors raised before execution starts. Each maps to a process exit code.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't open {}", path.display())]
    NotFound { path: PathBuf },

    #[error("couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid number: {token}")]
    InvalidLiteral { line: usize, token: String },

    #[error("program is {len} bytes, memory holds 256")]
    ProgramTooLarge { len: usize },

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

impl LoadError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::NotFound { .. } => 2,
            _ => 1,
        }
    }
}
