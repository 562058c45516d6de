//! Memory implementations

mod addr;

pub use addr::{Address, AddressOp};

use {crate::RAM_SIZE, derive_more::Display};

/// Byte-addressed memory access
pub trait Memory {
    /// Load byte from memory on address
    fn load(&self, addr: Address) -> Result<u8, LoadError>;

    /// Store byte to memory on address
    fn store(&mut self, addr: Address, value: u8) -> Result<(), StoreError>;

    /// Read from program memory to execute
    fn prog_read(&self, addr: Address) -> Option<u8>;
}

/// Unhandled load access trap
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[display(fmt = "Load access error at address {_0}")]
pub struct LoadError(pub Address);

/// Unhandled store access trap
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[display(fmt = "Store access error at address {_0}")]
pub struct StoreError(pub Address);

impl From<LoadError> for crate::VmRunError {
    fn from(value: LoadError) -> Self {
        Self::LoadAccessEx(value.0)
    }
}

impl From<StoreError> for crate::VmRunError {
    fn from(value: StoreError) -> Self {
        Self::StoreAccessEx(value.0)
    }
}

/// Flat RAM, shared by program, data and stack
///
/// Addresses past [`RAM_SIZE`] fault, they never wrap.
#[derive(Clone, PartialEq, Eq)]
pub struct Ram {
    cells: [u8; RAM_SIZE],
}

impl Default for Ram {
    fn default() -> Self {
        Self {
            cells: [0; RAM_SIZE],
        }
    }
}

impl Ram {
    /// Write image to RAM, starting at address 0
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), StoreError> {
        for (addr, &byte) in (0..).map(Address::new).zip(image) {
            self.store(addr, byte)?;
        }

        Ok(())
    }

    /// All RAM cells
    #[inline]
    pub fn cells(&self) -> &[u8; RAM_SIZE] {
        &self.cells
    }
}

impl Memory for Ram {
    #[inline]
    fn load(&self, addr: Address) -> Result<u8, LoadError> {
        self.cells
            .get(addr.truncate_usize())
            .copied()
            .ok_or(LoadError(addr))
    }

    #[inline]
    fn store(&mut self, addr: Address, value: u8) -> Result<(), StoreError> {
        *self
            .cells
            .get_mut(addr.truncate_usize())
            .ok_or(StoreError(addr))? = value;
        Ok(())
    }

    #[inline]
    fn prog_read(&self, addr: Address) -> Option<u8> {
        self.cells.get(addr.truncate_usize()).copied()
    }
}

impl core::fmt::Debug for Ram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Hexdump, 16 bytes a row
        for (row, chunk) in self.cells.chunks(16).enumerate() {
            write!(f, "{:02X}:", row * 16)?;
            for byte in chunk {
                write!(f, " {byte:02X}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
