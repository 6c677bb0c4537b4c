/// Represents an integer from 0 to 2^23 - 1, the range of a node offset.
///
/// This type guarantees that the top bit of a 24-bit integer is always zero.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct U23(u32);

impl U23 {
    pub const MAX: Self = Self(0x007f_ffff);

    #[inline(always)]
    pub const fn new(x: u32) -> Option<Self> {
        if x <= Self::MAX.get() {
            Some(Self(x))
        } else {
            None
        }
    }

    /// Keeps the low 23 bits of `x`.
    #[inline(always)]
    pub const fn truncate(x: u32) -> Self {
        Self(x & Self::MAX.0)
    }

    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Represents an integer from 0 to 2^15 - 1, the range of a label tail length.
///
/// This type guarantees that the top bit of a 16-bit integer is always zero.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct U15(u16);

impl U15 {
    pub const MAX: Self = Self(0x7fff);

    #[inline(always)]
    pub const fn new(x: u16) -> Option<Self> {
        if x <= Self::MAX.get() {
            Some(Self(x))
        } else {
            None
        }
    }

    /// Keeps the low 15 bits of `x`.
    #[inline(always)]
    pub const fn truncate(x: u16) -> Self {
        Self(x & Self::MAX.0)
    }

    #[inline(always)]
    pub const fn get(self) -> u16 {
        self.0
    }
}
