use crate::error::CpuError;

pub const NUM_REGISTERS: usize = 8;

/// Register reserved by convention for the stack pointer.
pub const SP: u8 = 7;

/// Value R7 holds when a CPU is built with the default config. The stack
/// pointer is not pre-seeded to the top of memory; programs that use the
/// stack load R7 themselves (or the CLI's `--sp` overrides this).
pub const INITIAL_SP: u8 = 0;

/// General-purpose registers R0..R7, all `u8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u8; NUM_REGISTERS],
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile { regs: [0; NUM_REGISTERS] }
    }

    pub fn get(&self, index: u8) -> Result<u8, CpuError> {
        self.regs
            .get(index as usize)
            .copied()
            .ok_or(CpuError::RegisterIndex { index })
    }

    pub fn set(&mut self, index: u8, value: u8) -> Result<(), CpuError> {
        let reg = self
            .regs
            .get_mut(index as usize)
            .ok_or(CpuError::RegisterIndex { index })?;
        *reg = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.regs[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs[SP as usize] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.regs
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

const LESS_THAN: u8 = 0b0000_0100;
const GREATER_THAN: u8 = 0b0000_0010;
const EQUAL: u8 = 0b0000_0001;

/// Outcome of the most recent CMP. Exactly one flag is set after any
/// comparison; a fresh register has none set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    less_than: bool,
    greater_than: bool,
    equal: bool,
}

impl Flags {
    pub fn compare(a: u8, b: u8) -> Flags {
        Flags {
            less_than: a < b,
            greater_than: a > b,
            equal: a == b,
        }
    }

    pub fn set_from(&mut self, a: u8, b: u8) {
        *self = Flags::compare(a, b);
    }

    pub fn is_less_than(&self) -> bool {
        self.less_than
    }

    pub fn is_greater_than(&self) -> bool {
        self.greater_than
    }

    pub fn is_equal(&self) -> bool {
        self.equal
    }

    /// Packed as `0b00000LGE`.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.less_than {
            bits |= LESS_THAN;
        }
        if self.greater_than {
            bits |= GREATER_THAN;
        }
        if self.equal {
            bits |= EQUAL;
        }
        bits
    }
}
