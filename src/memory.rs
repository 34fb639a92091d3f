use std::fmt::{Debug, Formatter};

use crate::error::{CpuError, LoadError};

pub const MEMORY_SIZE: usize = 256;

/// Flat byte store. Addresses outside `0..MEMORY_SIZE` are rejected rather
/// than wrapped.
pub struct Memory {
    mem: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory { mem: [0; MEMORY_SIZE] }
    }

    pub fn size(&self) -> usize {
        self.mem.len()
    }

    pub fn read(&self, addr: usize) -> Result<u8, CpuError> {
        self.mem
            .get(addr)
            .copied()
            .ok_or(CpuError::Address { address: addr })
    }

    pub fn write(&mut self, addr: usize, val: u8) -> Result<(), CpuError> {
        let cell = self
            .mem
            .get_mut(addr)
            .ok_or(CpuError::Address { address: addr })?;
        *cell = val;
        Ok(())
    }

    /// Copy a program image in starting at address 0.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > self.size() {
            return Err(LoadError::ProgramTooLarge { len: bytes.len() });
        }
        self.mem[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Byte at `addr`, or 0 past the end. Only for trace output.
    pub(crate) fn peek(&self, addr: usize) -> u8 {
        self.mem.get(addr).copied().unwrap_or(0)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &self.size()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_read_write() {
        let mut m = Memory::new();
        m.write(0x10, 0xAA).unwrap();
        assert_eq!(m.read(0x10).unwrap(), 0xAA);
        assert_eq!(m.read(0x11).unwrap(), 0);
    }

    #[test]
    fn edges_are_addressable() {
        let mut m = Memory::new();
        m.write(0, 1).unwrap();
        m.write(255, 2).unwrap();
        assert_eq!(m.read(0).unwrap(), 1);
        assert_eq!(m.read(255).unwrap(), 2);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut m = Memory::new();
        assert_eq!(m.read(256), Err(CpuError::Address { address: 256 }));
        assert_eq!(m.write(300, 1), Err(CpuError::Address { address: 300 }));
    }

    #[test]
    fn load_image_fills_from_zero() {
        let mut m = Memory::new();
        m.load_image(&[3, 2, 1]).unwrap();
        assert_eq!(m.read(0).unwrap(), 3);
        assert_eq!(m.read(2).unwrap(), 1);
        assert_eq!(m.read(3).unwrap(), 0);

        let full = [0xFFu8; MEMORY_SIZE];
        assert!(m.load_image(&full).is_ok());
        let too_big = vec![0u8; MEMORY_SIZE + 1];
        assert!(matches!(
            m.load_image(&too_big),
            Err(LoadError::ProgramTooLarge { len: 257 })
        ));
    }
}
