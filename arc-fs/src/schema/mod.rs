//! Filesystem-table parsers for the two ARC schema generations.
//!
//! Neither schema is self-describing: every table's length comes from
//! a count field read earlier (or a fixed skip distance for reserved
//! regions), so the read order is a strict contract.

pub mod v1;
pub mod v2;

use crate::types::{
    FileInfoV1, FileInfoV2, StreamEntryUnk, StreamHashToName, StreamIndexToOffset,
    StreamNameToHash, StreamOffset, Table,
};

pub use v1::V1Tables;
pub use v2::V2Tables;

/// The stream-namespace table set, shared by both schema generations
/// (V1 containers simply leave two of the tables empty).
#[derive(Debug)]
pub struct StreamTables {
    pub unks: Table<StreamEntryUnk>,
    pub hash_to_name: Table<StreamHashToName>,
    pub name_to_hash: Table<StreamNameToHash>,
    pub index_to_offset: Table<StreamIndexToOffset>,
    pub offsets: Table<StreamOffset>,
}

impl StreamTables {
    pub fn empty() -> Self {
        Self {
            unks: Table::empty("streamUnk"),
            hash_to_name: Table::empty("streamHashToName"),
            name_to_hash: Table::empty("streamNameToHash"),
            index_to_offset: Table::empty("streamIndexToOffset"),
            offsets: Table::empty("streamOffsets"),
        }
    }
}

/// Parsed filesystem table set, tagged by schema generation.
///
/// All downstream resolution branches on this tag once instead of
/// duck-typing the record layouts.
#[derive(Debug)]
pub enum FileSystem {
    V1(V1Tables),
    V2(V2Tables),
}

impl FileSystem {
    pub fn version(&self) -> u32 {
        match self {
            Self::V1(t) => t.version,
            Self::V2(t) => t.version,
        }
    }

    pub fn streams(&self) -> &StreamTables {
        match self {
            Self::V1(t) => &t.streams,
            Self::V2(t) => &t.streams,
        }
    }

    /// Number of file records in the regular namespace.
    pub fn file_count(&self) -> usize {
        match self {
            Self::V1(t) => t.file_infos.len(),
            Self::V2(t) => t.file_infos.len(),
        }
    }

    pub fn as_v1(&self) -> Option<&Table<FileInfoV1>> {
        match self {
            Self::V1(t) => Some(&t.file_infos),
            Self::V2(_) => None,
        }
    }

    pub fn as_v2(&self) -> Option<&V2Tables> {
        match self {
            Self::V1(_) => None,
            Self::V2(t) => Some(t),
        }
    }
}
