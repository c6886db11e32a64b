//! The 40-bit path hash used throughout the ARC filesystem tables.

use crate::crc32::crc32c;
use std::fmt;

/// A 40-bit path hash: the low 32 bits are the CRC-32C of the path
/// string, the next 8 bits its length.
///
/// Tables store the two halves separately (a `u32` hash column and a
/// length hint squeezed into the low byte of a neighbouring field);
/// this type is the combined dictionary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash40(pub u64);

impl Hash40 {
    /// Hashes a path string.
    pub fn of(path: &str) -> Self {
        let len = (path.len() & 0xFF) as u64;
        Self((len << 32) | u64::from(crc32c(path.as_bytes())))
    }

    /// Reassembles a hash from its table representation.
    pub fn from_parts(crc: u32, len: u8) -> Self {
        Self((u64::from(len) << 32) | u64::from(crc))
    }

    /// The CRC-32C half.
    pub fn crc(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }

    /// The length-hint half.
    pub fn len(self) -> u8 {
        ((self.0 >> 32) & 0xFF) as u8
    }

    /// `true` if the length hint is zero.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::LowerHex for Hash40 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}
