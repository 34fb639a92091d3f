use std::collections::HashMap;

use crate::error::AssembleError;
use crate::opcode::Opcode;
use crate::registers::NUM_REGISTERS;

/// Assemble LS-8 mnemonics into bytes.
/// - Two-pass: first collects labels, then encodes.
/// - Comments start with ';' or '#'; blank lines are skipped.
/// - Registers: R0..R7
/// - Immediates: decimal (42), hex (0x2A), binary (0b101010) or a label.
pub fn assemble(src: &str) -> Result<Vec<u8>, AssembleError> {
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut lines: Vec<(usize, Opcode, String)> = Vec::new();
    let mut pc: usize = 0;

    for (lineno, raw) in src.lines().enumerate() {
        let lineno = lineno + 1;
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }
        if let Some(label) = line.strip_suffix(':') {
            let label = label.trim();
            if label.is_empty() {
                return Err(AssembleError::EmptyLabel { line: lineno });
            }
            if labels.contains_key(label) {
                return Err(AssembleError::DuplicateLabel {
                    line: lineno,
                    label: label.to_string(),
                });
            }
            labels.insert(label.to_string(), pc);
            continue;
        }

        let (mnemonic, operands) = split_mnemonic_operands(line);
        let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
            AssembleError::UnknownMnemonic {
                line: lineno,
                mnemonic: mnemonic.to_string(),
            }
        })?;
        lines.push((lineno, opcode, operands.to_string()));
        pc += opcode.size();
    }

    let mut out: Vec<u8> = Vec::with_capacity(pc);
    for (lineno, opcode, operands) in lines {
        let parts: Vec<&str> = operands
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != opcode.operand_count() {
            return Err(AssembleError::OperandCount {
                line: lineno,
                mnemonic: opcode.mnemonic(),
                expected: opcode.operand_count(),
                actual: parts.len(),
            });
        }

        out.push(opcode.byte());
        for (i, part) in parts.iter().enumerate() {
            let byte = if i == 1 && opcode.takes_immediate() {
                parse_value(part, lineno, &labels)?
            } else {
                parse_reg(part, lineno)?
            };
            out.push(byte);
        }
    }

    Ok(out)
}

fn strip_comment(raw: &str) -> &str {
    let end = raw.find(|c: char| c == ';' || c == '#').unwrap_or(raw.len());
    raw[..end].trim()
}

fn split_mnemonic_operands(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(idx) => {
            let (m, rest) = line.split_at(idx);
            (m, rest.trim())
        }
        None => (line, ""),
    }
}

fn parse_reg(s: &str, line: usize) -> Result<u8, AssembleError> {
    let invalid = || AssembleError::InvalidRegister {
        line,
        token: s.to_string(),
    };
    let idx = s
        .strip_prefix('R')
        .or_else(|| s.strip_prefix('r'))
        .ok_or_else(invalid)?;
    match idx.parse::<u8>() {
        Ok(r) if (r as usize) < NUM_REGISTERS => Ok(r),
        _ => Err(invalid()),
    }
}

fn parse_value(s: &str, line: usize, labels: &HashMap<String, usize>) -> Result<u8, AssembleError> {
    let invalid = || AssembleError::InvalidValue {
        line,
        token: s.to_string(),
    };
    if let Some(&addr) = labels.get(s) {
        return u8::try_from(addr).map_err(|_| invalid());
    }
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u8::from_str_radix(bin, 2)
    } else {
        s.parse::<u8>()
    };
    parsed.map_err(|_| invalid())
}
