//! Register file

use {
    crate::{REG_COUNT, SP, SP_INIT},
    core::fmt::Debug,
};

/// Eight general purpose byte registers, the last one doubling as
/// stack pointer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Registers([u8; REG_COUNT as usize]);

impl Registers {
    /// Read register, [`None`] if out of the register file
    #[inline]
    pub fn get(&self, n: u8) -> Option<u8> {
        self.0.get(usize::from(n)).copied()
    }

    #[inline]
    pub fn get_mut(&mut self, n: u8) -> Option<&mut u8> {
        self.0.get_mut(usize::from(n))
    }

    /// Stack pointer
    #[inline]
    pub fn sp(&self) -> u8 {
        self.0[usize::from(SP)]
    }

    #[inline]
    pub fn set_sp(&mut self, value: u8) {
        self.0[usize::from(SP)] = value;
    }

    /// Raw register values, r0 first
    #[inline]
    pub fn as_array(&self) -> &[u8; REG_COUNT as usize] {
        &self.0
    }
}

impl Default for Registers {
    fn default() -> Self {
        let mut regs = Self([0; REG_COUNT as usize]);
        regs.set_sp(SP_INIT);
        regs
    }
}

impl Debug for Registers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (n, value) in self.0.iter().enumerate() {
            if n != 0 {
                f.write_str(" ")?;
            }

            match n as u8 {
                SP => write!(f, "sp={value:02x}")?,
                _ => write!(f, "r{n}={value:02x}")?,
            }
        }
        Ok(())
    }
}
