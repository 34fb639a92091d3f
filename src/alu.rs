use std::fmt;
use std::str::FromStr;

use crate::error::CpuError;
use crate::registers::{Flags, RegisterFile};

/// Register-to-register operations. Results wrap modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
    Cmp,
}

impl AluOp {
    pub fn name(&self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
            AluOp::Cmp => "CMP",
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AluOp {
    type Err = CpuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADD" => Ok(AluOp::Add),
            "MUL" => Ok(AluOp::Mul),
            "CMP" => Ok(AluOp::Cmp),
            _ => Err(CpuError::UnsupportedOperation { name: s.to_string() }),
        }
    }
}

/// Apply `op` to registers `reg_a` and `reg_b`. ADD and MUL write back into
/// `reg_a` and leave the flags alone; CMP only touches the flags.
pub fn execute(
    op: AluOp,
    regs: &mut RegisterFile,
    flags: &mut Flags,
    reg_a: u8,
    reg_b: u8,
) -> Result<(), CpuError> {
    let a = regs.get(reg_a)?;
    let b = regs.get(reg_b)?;
    match op {
        AluOp::Add => regs.set(reg_a, a.wrapping_add(b)),
        AluOp::Mul => regs.set(reg_a, a.wrapping_mul(b)),
        AluOp::Cmp => {
            flags.set_from(a, b);
            Ok(())
        }
    }
}

/// Name-addressed entry point; unknown names are `UnsupportedOperation`.
pub fn execute_named(
    name: &str,
    regs: &mut RegisterFile,
    flags: &mut Flags,
    reg_a: u8,
    reg_b: u8,
) -> Result<(), CpuError> {
    execute(name.parse()?, regs, flags, reg_a, reg_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: u8, b: u8) -> u8 {
        let mut regs = RegisterFile::new();
        let mut flags = Flags::default();
        regs.set(0, a).unwrap();
        regs.set(1, b).unwrap();
        execute(AluOp::Add, &mut regs, &mut flags, 0, 1).unwrap();
        assert_eq!(regs.get(1).unwrap(), b);
        assert_eq!(flags, Flags::default());
        regs.get(0).unwrap()
    }

    #[test]
    fn add_wraps_at_byte_boundary() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(add(254, 1), 255);
        assert_eq!(add(255, 1), 0);
        assert_eq!(add(128, 128), 0);
    }

    #[test]
    fn mul_writes_back_wrapped() {
        let mut regs = RegisterFile::new();
        let mut flags = Flags::default();
        regs.set(2, 8).unwrap();
        regs.set(3, 9).unwrap();
        execute(AluOp::Mul, &mut regs, &mut flags, 2, 3).unwrap();
        assert_eq!(regs.get(2).unwrap(), 72);

        regs.set(2, 16).unwrap();
        regs.set(3, 17).unwrap();
        execute(AluOp::Mul, &mut regs, &mut flags, 2, 3).unwrap();
        assert_eq!(regs.get(2).unwrap(), (16u16 * 17 % 256) as u8);
    }

    #[test]
    fn cmp_leaves_registers() {
        let mut regs = RegisterFile::new();
        let mut flags = Flags::default();
        regs.set(0, 3).unwrap();
        regs.set(1, 7).unwrap();
        execute(AluOp::Cmp, &mut regs, &mut flags, 0, 1).unwrap();
        assert!(flags.is_less_than());
        assert_eq!(regs.get(0).unwrap(), 3);
        assert_eq!(regs.get(1).unwrap(), 7);
    }

    #[test]
    fn bad_register_propagates() {
        let mut regs = RegisterFile::new();
        let mut flags = Flags::default();
        assert_eq!(
            execute(AluOp::Add, &mut regs, &mut flags, 0, 9),
            Err(CpuError::RegisterIndex { index: 9 })
        );
    }

    #[test]
    fn named_ops() {
        let mut regs = RegisterFile::new();
        let mut flags = Flags::default();
        regs.set(0, 1).unwrap();
        execute_named("add", &mut regs, &mut flags, 0, 0).unwrap();
        assert_eq!(regs.get(0).unwrap(), 2);

        assert_eq!(
            execute_named("SUB", &mut regs, &mut flags, 0, 0),
            Err(CpuError::UnsupportedOperation { name: "SUB".into() })
        );
        assert_eq!(regs.get(0).unwrap(), 2);
        assert_eq!("cmp".parse::<AluOp>(), Ok(AluOp::Cmp));
    }
}
