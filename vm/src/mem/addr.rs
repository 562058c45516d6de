//! RAM address

use {crate::utils::impl_display, core::ops};

/// Memory address
///
/// Wider than a byte so running off the end of RAM is observable
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u16);
impl Address {
    /// A null address
    pub const NULL: Self = Self(0);

    /// Cast to [`usize`]
    #[inline(always)]
    pub fn truncate_usize(self) -> usize {
        self.0.into()
    }

    /// Get inner value
    #[inline(always)]
    pub fn get(self) -> u16 {
        self.0
    }

    /// Construct new address
    #[inline(always)]
    pub const fn new(val: u16) -> Self {
        Self(val)
    }
}

impl_display!(for Address =>
    |Address(a)| "{a:#04x}"
);

impl From<u8> for Address {
    #[inline]
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl<T: AddressOp> ops::Add<T> for Address {
    type Output = Self;

    #[inline]
    fn add(self, rhs: T) -> Self::Output {
        Self(self.0.wrapping_add(rhs.cast_u16()))
    }
}

impl<T: AddressOp> ops::AddAssign<T> for Address {
    #[inline]
    fn add_assign(&mut self, rhs: T) {
        self.0 = self.0.wrapping_add(rhs.cast_u16())
    }
}

/// Values which can be used as an address offset
pub trait AddressOp {
    /// Cast to u16, truncating or extending
    fn cast_u16(self) -> u16;
}

macro_rules! impl_address_ops(($($ty:ty),* $(,)?) => {
    $(impl AddressOp for $ty {
        #[inline(always)]
        fn cast_u16(self) -> u16 { self as _ }
    })*
});

impl_address_ops!(u8, u16, usize);
