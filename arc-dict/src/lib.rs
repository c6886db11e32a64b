//! Path-hash dictionary for the ARC archive format.
//!
//! ARC filesystem tables store no path strings at all, only CRC32-C
//! hashes paired with a one-byte length hint (together a 40-bit
//! "hash40"). This crate provides the hash functions and the
//! [`HashLabels`] registry that maps hashes back to human-readable
//! strings.

pub mod crc32;
pub mod hash40;
pub mod labels;

pub use crc32::crc32c;
pub use hash40::Hash40;
pub use labels::HashLabels;
