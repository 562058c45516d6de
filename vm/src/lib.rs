//! LS-8 Virtual Machine
//!
//! Eight 8-bit registers, 256 bytes of RAM and a stack growing downward
//! from [`SP_INIT`] in that same RAM.

// # General notice:
// - Register 7 is the stack pointer, it is still addressable by programs
// - All arithmetic wraps on byte boundaries, SP included
// - The VM does no I/O, printing is delegated to the host through `VmRunOk::Print`

#![no_std]

pub mod mem;
pub mod regs;

mod stack;
mod trace;
mod utils;
mod vmrun;

#[cfg(test)]
mod tests;

pub use {ls8bytecode::REG_COUNT, trace::Trace};

use {
    mem::{Address, Memory},
    regs::Registers,
    static_assertions::const_assert,
};

/// Index of the register serving as stack pointer
pub const SP: u8 = 7;

/// Stack pointer value at start-up
pub const SP_INIT: u8 = 0xF4;

/// Size of RAM in bytes
pub const RAM_SIZE: usize = 256;

const_assert!(SP < REG_COUNT);
const_assert!((SP_INIT as usize) < RAM_SIZE);

/// LS-8 Virtual Machine
pub struct Vm<Mem, const TIMER_QUOTIENT: usize> {
    /// Register file, stack pointer included
    pub registers: Registers,

    /// Memory implementation
    pub memory: Mem,

    /// Program counter
    pub pc: Address,

    /// Set by HLT, never cleared
    halted: bool,

    /// Instructions executed, counted only with a non-zero quota
    timer: usize,
}

impl<Mem: Default, const TIMER_QUOTIENT: usize> Default for Vm<Mem, TIMER_QUOTIENT> {
    fn default() -> Self {
        Self::new(Mem::default())
    }
}

impl<Mem, const TIMER_QUOTIENT: usize> Vm<Mem, TIMER_QUOTIENT> {
    /// Create a new VM over memory with program already loaded at address 0
    pub fn new(memory: Mem) -> Self {
        Self {
            registers: Registers::default(),
            memory,
            pc: Address::NULL,
            halted: false,
            timer: 0,
        }
    }

    /// Has the machine executed HLT
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Read register
    #[inline]
    pub fn read_reg(&self, n: u8) -> Result<u8, VmRunError> {
        self.registers.get(n).ok_or(VmRunError::RegOutOfBounds(n))
    }

    /// Write register
    #[inline]
    pub fn write_reg(&mut self, n: u8, value: u8) -> Result<(), VmRunError> {
        *self.registers.get_mut(n).ok_or(VmRunError::RegOutOfBounds(n))? = value;
        Ok(())
    }

    /// Snapshot of machine state for the trace channel
    pub fn trace(&self) -> Trace<'_, Mem, TIMER_QUOTIENT>
    where
        Mem: Memory,
    {
        Trace(self)
    }
}

/// Virtual machine halt error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VmRunError {
    /// Tried to execute invalid instruction
    InvalidOpcode(Address, u8),

    /// ALU asked to perform an operation it does not implement
    InvalidAluOp(u8),

    /// Register out-of-bounds access
    RegOutOfBounds(u8),

    /// Unhandled load access exception
    LoadAccessEx(Address),

    /// Unhandled instruction load access exception
    ProgramFetchLoadEx(Address),

    /// Unhandled store access exception
    StoreAccessEx(Address),
}

impl core::fmt::Display for VmRunError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VmRunError::InvalidOpcode(address, op) => {
                write!(f, "invalid opcode {op:#010b} at {address}")
            }
            VmRunError::InvalidAluOp(op) => write!(f, "unsupported ALU operation {op:#010b}"),
            VmRunError::RegOutOfBounds(n) => write!(f, "register r{n} out of bounds"),
            VmRunError::LoadAccessEx(address) => write!(f, "failed to load at {address}"),
            VmRunError::ProgramFetchLoadEx(address) => {
                write!(f, "failed to load instruction at {address}")
            }
            VmRunError::StoreAccessEx(address) => write!(f, "failed to store at {address}"),
        }
    }
}

impl core::error::Error for VmRunError {}

/// Virtual machine halt ok
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VmRunOk {
    /// Program executed HLT
    End,

    /// Host step quota of `TIMER_QUOTIENT` instructions ran out, the
    /// program does not observe this
    Timer,

    /// Program asks the host to print a value
    Print(u8),
}
