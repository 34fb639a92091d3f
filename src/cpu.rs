// src/cpu.rs
use log::{debug, info, warn};

use crate::alu::{self, AluOp};
use crate::device::{OutputDevice, StdoutDevice};
use crate::error::{CpuError, LoadError};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::registers::{Flags, RegisterFile, INITIAL_SP, SP};

/// Construction-time settings for a [`CPU`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Value loaded into R7 at construction.
    pub initial_sp: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig { initial_sp: INITIAL_SP }
    }
}

/// Result of a single [`CPU::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    Halted,
}

/// How a handler leaves the program counter.
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

#[derive(Debug)]
pub struct CPU<O: OutputDevice = StdoutDevice> {
    pub regs: RegisterFile,
    pub flags: Flags,
    pub pc: usize,
    pub mem: Memory,
    /// Instructions retired so far.
    pub steps: u64,
    pub halted: bool,
    output: O,
}

impl CPU<StdoutDevice> {
    pub fn new() -> Self {
        CPU::with_output(StdoutDevice)
    }
}

impl Default for CPU<StdoutDevice> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: OutputDevice> CPU<O> {
    pub fn with_output(output: O) -> Self {
        CPU::with_config(CpuConfig::default(), output)
    }

    pub fn with_config(config: CpuConfig, output: O) -> Self {
        let mut regs = RegisterFile::new();
        regs.set_sp(config.initial_sp);
        CPU {
            regs,
            flags: Flags::default(),
            pc: 0,
            mem: Memory::new(),
            steps: 0,
            halted: false,
            output,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Place `program` at address 0 and reset the program counter.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.mem.load_image(program)?;
        self.pc = 0;
        if program.is_empty() {
            warn!("Program was empty!");
        } else {
            info!("loaded {} bytes", program.len());
        }
        Ok(())
    }

    pub fn alu(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<(), CpuError> {
        alu::execute(op, &mut self.regs, &mut self.flags, reg_a, reg_b)
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<Step, CpuError> {
        if self.halted {
            return Ok(Step::Halted);
        }

        let pc = self.pc;
        let byte = self.mem.read(pc)?;
        let opcode =
            Opcode::from_byte(byte).ok_or(CpuError::IllegalInstruction { opcode: byte, pc })?;

        let mut operands = [0u8; 2];
        for (i, slot) in operands.iter_mut().take(opcode.operand_count()).enumerate() {
            *slot = self.mem.read(pc + 1 + i)?;
        }
        let [a, b] = operands;
        debug!("{:02X}: {} {:?}", pc, opcode.mnemonic(), &operands[..opcode.operand_count()]);

        let flow = match opcode {
            Opcode::Ldi => {
                self.regs.set(a, b)?;
                Flow::Next
            }
            Opcode::Prn => {
                let value = self.regs.get(a)?;
                self.output.emit(value);
                Flow::Next
            }
            Opcode::Mul => {
                self.alu(AluOp::Mul, a, b)?;
                let product = self.regs.get(a)?;
                self.output.emit(product);
                Flow::Next
            }
            Opcode::Add => {
                self.alu(AluOp::Add, a, b)?;
                Flow::Next
            }
            Opcode::Cmp => {
                self.alu(AluOp::Cmp, a, b)?;
                Flow::Next
            }
            Opcode::Jmp => Flow::Jump(self.regs.get(a)? as usize),
            Opcode::Jeq => {
                let target = self.regs.get(a)?;
                if self.flags.is_equal() {
                    Flow::Jump(target as usize)
                } else {
                    Flow::Next
                }
            }
            Opcode::Jne => {
                let target = self.regs.get(a)?;
                if !self.flags.is_equal() {
                    Flow::Jump(target as usize)
                } else {
                    Flow::Next
                }
            }
            Opcode::Push => {
                self.push_register(a, pc)?;
                Flow::Next
            }
            Opcode::Pop => {
                self.pop_register(a, pc)?;
                Flow::Next
            }
            Opcode::Call => {
                let ret = pc + opcode.size();
                let ret = u8::try_from(ret).map_err(|_| CpuError::Address { address: ret })?;
                self.regs.get(a)?;
                self.push_value(ret, pc)?;
                // the target is read after the push, so CALL R7 sees the new SP
                Flow::Jump(self.regs.get(a)? as usize)
            }
            Opcode::Ret => Flow::Jump(self.pop_value(pc)? as usize),
            Opcode::Hlt => Flow::Halt,
        };
        self.steps += 1;

        match flow {
            Flow::Next => self.pc = pc + opcode.size(),
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => {
                self.halted = true;
                info!("halted after {} instructions", self.steps);
                return Ok(Step::Halted);
            }
        }
        Ok(Step::Running)
    }

    /// Execute up to `n` instructions (or stop sooner if halted).
    /// Returns the number of instructions executed.
    pub fn step_n(&mut self, n: usize) -> Result<usize, CpuError> {
        let mut executed = 0usize;
        for _ in 0..n {
            if self.halted {
                break;
            }
            self.step()?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Run until HLT or the first fault.
    pub fn run(&mut self) -> Result<(), CpuError> {
        while self.step()? == Step::Running {}
        Ok(())
    }

    /// Like [`run`](Self::run), logging a trace line before each instruction.
    pub fn run_with_trace(&mut self) -> Result<(), CpuError> {
        while !self.halted {
            info!("{}", self.trace_line());
            self.step()?;
        }
        Ok(())
    }

    /// `TRACE: PC | M[PC] M[PC+1] M[PC+2] | R0 .. R7`, all in hex.
    pub fn trace_line(&self) -> String {
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            self.mem.peek(self.pc),
            self.mem.peek(self.pc + 1),
            self.mem.peek(self.pc + 2),
        );
        for r in self.regs.as_slice() {
            line.push_str(&format!(" {:02X}", r));
        }
        line
    }

    pub fn dump_state(&self) {
        debug!("--- CPU STATE ---");
        debug!("PC: {:02X} Steps: {}", self.pc, self.steps);
        debug!("FL: {:08b}", self.flags.bits());
        for (i, r) in self.regs.as_slice().iter().enumerate() {
            debug!("R{}: {:02X}", i, r);
        }
    }

    // Full-descending stack on R7. Every check runs before any state changes.

    fn push_value(&mut self, value: u8, pc: usize) -> Result<(), CpuError> {
        let sp = self.regs.sp().checked_sub(1).ok_or(CpuError::StackOverflow { pc })?;
        self.mem.write(sp as usize, value)?;
        self.regs.set_sp(sp);
        Ok(())
    }

    /// PUSH R7 stores the already-decremented stack pointer.
    fn push_register(&mut self, reg: u8, pc: usize) -> Result<(), CpuError> {
        let value = self.regs.get(reg)?;
        let value = if reg == SP { value.wrapping_sub(1) } else { value };
        self.push_value(value, pc)
    }

    fn pop_value(&mut self, pc: usize) -> Result<u8, CpuError> {
        let sp = self.regs.sp();
        let next = sp.checked_add(1).ok_or(CpuError::StackUnderflow { pc })?;
        let value = self.mem.read(sp as usize)?;
        self.regs.set_sp(next);
        Ok(value)
    }

    /// POP R7 keeps the popped value; the post-increment is dropped.
    fn pop_register(&mut self, reg: u8, pc: usize) -> Result<(), CpuError> {
        self.regs.get(reg)?;
        let value = self.pop_value(pc)?;
        self.regs.set(reg, value)
    }
}
