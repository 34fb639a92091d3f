pub mod alu;
pub mod assembler;
pub mod cpu;
pub mod device;
pub mod error;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod registers;

pub use cpu::{CpuConfig, Step, CPU};
pub use error::{AssembleError, CpuError, LoadError};
