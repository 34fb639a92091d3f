/// The instruction table. Each opcode has a fixed operand count; the bit
/// pattern of the opcode byte is not consulted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Hlt,
    Ret,
    Push,
    Pop,
    Prn,
    Call,
    Jmp,
    Jeq,
    Jne,
    Ldi,
    Add,
    Mul,
    Cmp,
}

pub const ALL: [Opcode; 13] = [
    Opcode::Hlt,
    Opcode::Ret,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Prn,
    Opcode::Call,
    Opcode::Jmp,
    Opcode::Jeq,
    Opcode::Jne,
    Opcode::Ldi,
    Opcode::Add,
    Opcode::Mul,
    Opcode::Cmp,
];

impl Opcode {
    pub fn byte(self) -> u8 {
        match self {
            Opcode::Hlt => 0b0000_0001,
            Opcode::Ret => 0b0001_0001,
            Opcode::Push => 0b0100_0101,
            Opcode::Pop => 0b0100_0110,
            Opcode::Prn => 0b0100_0111,
            Opcode::Call => 0b0101_0000,
            Opcode::Jmp => 0b0101_0100,
            Opcode::Jeq => 0b0101_0101,
            Opcode::Jne => 0b0101_0110,
            Opcode::Ldi => 0b1000_0010,
            Opcode::Add => 0b1010_0000,
            Opcode::Mul => 0b1010_0010,
            Opcode::Cmp => 0b1010_0111,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Opcode> {
        ALL.iter().copied().find(|op| op.byte() == byte)
    }

    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        let up = s.to_uppercase();
        ALL.iter().copied().find(|op| op.mnemonic() == up)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ret => "RET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Call => "CALL",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
            Opcode::Ldi => "LDI",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Cmp => "CMP",
        }
    }

    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Hlt | Opcode::Ret => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Prn
            | Opcode::Call
            | Opcode::Jmp
            | Opcode::Jeq
            | Opcode::Jne => 1,
            Opcode::Ldi | Opcode::Add | Opcode::Mul | Opcode::Cmp => 2,
        }
    }

    /// Instruction length in bytes, opcode included.
    pub fn size(self) -> usize {
        1 + self.operand_count()
    }

    /// Whether the second operand is an immediate rather than a register.
    pub fn takes_immediate(self) -> bool {
        matches!(self, Opcode::Ldi)
    }
}
