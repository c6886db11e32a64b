//! Parser for the legacy filesystem schema (version 1.0 containers).

use crate::error::Result;
use crate::schema::StreamTables;
use crate::types::{
    DirectoryEntry, DirectoryOffset, FileInfoV1, FileSystemHeaderV1, HashIndexGroup,
    StreamIndexToOffset, StreamNameToHash, StreamOffset, SubFileInfo, Table, VERSION_V1,
    read_table,
};
use std::io::{Cursor, Seek, SeekFrom};
use tracing::{debug, trace};

/// Byte length of the reserved block between the stream offsets and
/// the directory list (14 regions, 12 bytes each).
const RESERVED_BLOCK_SIZE: i64 = 0xC * 0xE;

/// Record size of the skipped legacy hash table.
const LEGACY_HASH_ENTRY_SIZE: i64 = 8;

/// Complete legacy-schema table set.
#[derive(Debug)]
pub struct V1Tables {
    pub header: FileSystemHeaderV1,
    pub version: u32,
    pub streams: StreamTables,
    pub directories: Table<DirectoryEntry>,
    pub directory_offsets: Table<DirectoryOffset>,
    pub directory_child_hash_group: Table<HashIndexGroup>,
    pub file_infos: Table<FileInfoV1>,
    pub sub_files: Table<SubFileInfo>,
}

/// Parses a decompressed legacy filesystem table.
pub fn parse(table: &[u8]) -> Result<V1Tables> {
    let mut r = Cursor::new(table);

    let header = FileSystemHeaderV1::read(&mut r)?;
    r.seek(SeekFrom::Start(FileSystemHeaderV1::PREFIX_SIZE as u64))?;

    // Legacy hash table, unused by resolution.
    r.seek_relative(LEGACY_HASH_ENTRY_SIZE * i64::from(header.part_1_count))?;

    trace!(position = r.position(), "stream tables");
    let mut streams = StreamTables::empty();
    streams.name_to_hash = read_table(
        "streamNameToHash",
        &mut r,
        header.part_1_count as usize,
        StreamNameToHash::read,
    )?;
    streams.index_to_offset = read_table(
        "streamIndexToOffset",
        &mut r,
        header.part_2_count as usize,
        StreamIndexToOffset::read,
    )?;
    streams.offsets = read_table(
        "streamOffsets",
        &mut r,
        header.music_file_count as usize,
        StreamOffset::read,
    )?;

    r.seek_relative(RESERVED_BLOCK_SIZE)?;

    trace!(position = r.position(), "directory tables");
    let directories = read_table(
        "directoryList",
        &mut r,
        header.folder_count as usize,
        DirectoryEntry::read,
    )?;
    let directory_offsets = read_table(
        "directoryOffsets",
        &mut r,
        (header.file_count_1 + header.file_count_2) as usize,
        DirectoryOffset::read,
    )?;
    let directory_child_hash_group = read_table(
        "directoryChildHashGroup",
        &mut r,
        header.hash_folder_count as usize,
        HashIndexGroup::read,
    )?;

    trace!(position = r.position(), "file information tables");
    let file_infos = read_table(
        "fileInformationV1",
        &mut r,
        header.file_info_count as usize,
        FileInfoV1::read,
    )?;
    let sub_files = read_table(
        "subFiles",
        &mut r,
        (header.sub_file_count + header.sub_file_count_2) as usize,
        SubFileInfo::read,
    )?;

    debug!(
        files = file_infos.len(),
        sub_files = sub_files.len(),
        directories = directories.len(),
        streams = streams.name_to_hash.len(),
        "legacy filesystem table parsed"
    );

    Ok(V1Tables {
        header,
        version: VERSION_V1,
        streams,
        directories,
        directory_offsets,
        directory_child_hash_group,
        file_infos,
        sub_files,
    })
}
