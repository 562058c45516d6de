//! Stack protocol
//!
//! Stack lives in RAM below [`crate::SP_INIT`] and grows downward.
//! SP always points at the topmost occupied cell.

use crate::{
    mem::{Address, Memory},
    Vm, VmRunError,
};

impl<Mem, const TIMER_QUOTIENT: usize> Vm<Mem, TIMER_QUOTIENT>
where
    Mem: Memory,
{
    /// Address SP points to
    #[inline]
    fn sp_addr(&self) -> Address {
        Address::from(self.registers.sp())
    }

    /// Decrement SP, then store value at the new top
    pub fn push(&mut self, value: u8) -> Result<(), VmRunError> {
        self.registers.set_sp(self.registers.sp().wrapping_sub(1));
        self.memory.store(self.sp_addr(), value)?;
        log::trace!("push {value:#04x} at {}", self.sp_addr());
        Ok(())
    }

    /// Read value on top of the stack, leaving the stack untouched
    #[inline]
    pub fn top(&self) -> Result<u8, VmRunError> {
        Ok(self.memory.load(self.sp_addr())?)
    }

    /// Clear the top cell and increment SP
    pub fn discard(&mut self) -> Result<(), VmRunError> {
        self.memory.store(self.sp_addr(), 0)?;
        self.registers.set_sp(self.registers.sp().wrapping_add(1));
        Ok(())
    }

    /// Take value off the stack: read, clear, increment
    pub fn pop(&mut self) -> Result<u8, VmRunError> {
        let value = self.top()?;
        self.discard()?;
        log::trace!("pop {value:#04x}");
        Ok(value)
    }
}
