use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;

use crate::assembler;
use crate::error::LoadError;
use crate::memory::MEMORY_SIZE;

/// Parse a program listing: one base-2 byte per line, starting at address 0.
/// - Lines whose first non-blank character is `#` are comments.
/// - Blank lines are skipped.
/// - Only the first token on a line counts; anything after it is ignored.
pub fn parse_program(src: &str) -> Result<Vec<u8>, LoadError> {
    let mut out: Vec<u8> = Vec::new();

    for (lineno, raw) in src.lines().enumerate() {
        let token = match raw.split_whitespace().next() {
            Some(t) => t,
            None => continue,
        };
        if token.starts_with('#') {
            continue;
        }
        let byte = u8::from_str_radix(token, 2).map_err(|_| LoadError::InvalidLiteral {
            line: lineno + 1,
            token: token.to_string(),
        })?;
        out.push(byte);
        if out.len() > MEMORY_SIZE {
            return Err(LoadError::ProgramTooLarge { len: out.len() });
        }
    }

    Ok(out)
}

/// Read a program from disk. `.asm` files go through the assembler; anything
/// else is treated as a binary-literal listing.
pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let src = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io { path: path.to_path_buf(), source: e },
    })?;

    let is_asm = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("asm"));
    let bytes = if is_asm {
        assembler::assemble(&src)?
    } else {
        parse_program(&src)?
    };
    if bytes.len() > MEMORY_SIZE {
        return Err(LoadError::ProgramTooLarge { len: bytes.len() });
    }
    info!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CPU;
    use crate::error::CpuError;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ls8-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn comments_and_blanks_load_nothing() {
        let src = "# a comment\n\n   # indented comment\n\t\n";
        assert_eq!(parse_program(src).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn sequential_addresses_skip_comments() {
        let src = r#"
# print8.ls8
10000010 # LDI R0,8
00000000

00001000
    # PRN R0
01000111
00000000
00000001 # HLT
"#;
        let bytes = parse_program(src).unwrap();
        assert_eq!(
            bytes,
            vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
        );
    }

    #[test]
    fn bad_literal_reports_line() {
        let src = "00000001\n# ok\n10000012\n";
        match parse_program(src) {
            Err(LoadError::InvalidLiteral { line, token }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "10000012");
            }
            other => panic!("unexpected {:?}", other),
        }
        // does not fit in a byte
        assert!(matches!(
            parse_program("100000000"),
            Err(LoadError::InvalidLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn too_many_bytes() {
        let src = "00000000\n".repeat(MEMORY_SIZE + 1);
        assert!(matches!(
            parse_program(&src),
            Err(LoadError::ProgramTooLarge { .. })
        ));
        let src = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(parse_program(&src).unwrap().len(), MEMORY_SIZE);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/definitely/not/here.ls8")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn load_ls8_file_and_run() {
        let path = temp_file(
            "mult.ls8",
            "10000010\n00000000\n00001000\n10000010\n00000001\n00001001\n\
             10100010\n00000000\n00000001\n00000001\n",
        );
        let bytes = load_file(&path).unwrap();
        let mut cpu = CPU::with_output(Vec::<u8>::new());
        cpu.load(&bytes).unwrap();
        cpu.run().unwrap();
        assert_eq!(cpu.output(), &vec![72]);
    }

    #[test]
    fn load_asm_file() {
        let path = temp_file("print8.asm", "LDI R0, 8\nPRN R0\nHLT\n");
        let bytes = load_file(&path).unwrap();
        assert_eq!(bytes, vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]);
    }

    #[test]
    fn comment_only_file_runs_into_illegal_instruction() {
        let path = temp_file("empty.ls8", "# nothing here\n# at all\n");
        let bytes = load_file(&path).unwrap();
        assert!(bytes.is_empty());

        let mut cpu = CPU::with_output(Vec::<u8>::new());
        cpu.load(&bytes).unwrap();
        assert_eq!(
            cpu.run(),
            Err(CpuError::IllegalInstruction { opcode: 0, pc: 0 })
        );
    }
}
