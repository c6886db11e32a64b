//! Parser for the modern (versioned, extensible) filesystem schema.

use crate::error::Result;
use crate::schema::StreamTables;
use crate::types::{
    DirectoryEntry, DirectoryOffset, FileInfoIndex, FileInfoPath, FileInfoSubIndex,
    FileInfoUnknown, FileInfoV2, FileSystemHeader, HashIndexGroup, StreamEntryUnk,
    StreamHashToName, StreamHeader, StreamIndexToOffset, StreamNameToHash, StreamOffset,
    SubFileInfo, Table, VERSION_V2, read_table,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// Decompressed tables at least this large carry the newer header
/// with four extra count fields.
pub const EXTRA_COUNT_TABLE_SIZE: usize = 0x0299_2DD4;

/// Byte length of the regional reservation block (14 regions, 12
/// bytes each).
const REGIONAL_BLOCK_SIZE: usize = 0xE * 12;

/// Absolute resume offset when the extra-count block is absent.
const BASELINE_TABLE_START: u64 = 0x3C;

/// Extra table counts carried by the newer sub-version header.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtraCounts {
    pub folder: u32,
    pub file_info: u32,
    pub sub_index: u32,
    pub sub_file: u32,
}

/// Complete modern-schema table set.
#[derive(Debug)]
pub struct V2Tables {
    pub header: FileSystemHeader,
    pub version: u32,
    pub extra: ExtraCounts,
    /// Regional reservation block, unparsed, retained for rebuild.
    pub regional_bytes: Vec<u8>,
    pub stream_header: StreamHeader,
    pub streams: StreamTables,
    pub unknown_entries: Table<FileInfoUnknown>,
    pub path_to_index_group: Table<HashIndexGroup>,
    pub file_info_paths: Table<FileInfoPath>,
    pub file_info_indices: Table<FileInfoIndex>,
    pub directory_hash_group: Table<HashIndexGroup>,
    pub directories: Table<DirectoryEntry>,
    pub directory_offsets: Table<DirectoryOffset>,
    pub directory_child_hash_group: Table<HashIndexGroup>,
    pub file_infos: Table<FileInfoV2>,
    pub sub_indices: Table<FileInfoSubIndex>,
    pub sub_files: Table<SubFileInfo>,
}

/// Reads the version discriminant and extra counts that follow the
/// base header.
///
/// With the extra block present the counts pad the directory-offset,
/// file-info, sub-index, and sub-file tables; without it the version
/// is fixed at the baseline constant and parsing resumes at a fixed
/// offset instead.
fn read_version_block<R: Read + Seek>(r: &mut R, has_extras: bool) -> Result<(u32, ExtraCounts)> {
    if !has_extras {
        r.seek(SeekFrom::Start(BASELINE_TABLE_START))?;
        return Ok((VERSION_V2, ExtraCounts::default()));
    }

    let version = r.read_u32::<LittleEndian>()?;
    let folder = r.read_u32::<LittleEndian>()?;
    let file_info = r.read_u32::<LittleEndian>()?;
    r.seek_relative(8)?;
    let sub_index = r.read_u32::<LittleEndian>()?;
    let sub_file = r.read_u32::<LittleEndian>()?;

    Ok((
        version,
        ExtraCounts {
            folder,
            file_info,
            sub_index,
            sub_file,
        },
    ))
}

/// Parses a decompressed modern filesystem table.
pub fn parse(table: &[u8]) -> Result<V2Tables> {
    let mut r = Cursor::new(table);

    let header = FileSystemHeader::read(&mut r)?;
    let (version, extra) = read_version_block(&mut r, table.len() >= EXTRA_COUNT_TABLE_SIZE)?;
    debug!(version = format_args!("{version:#x}"), "parsing filesystem table");

    let mut regional_bytes = vec![0u8; REGIONAL_BLOCK_SIZE];
    r.read_exact(&mut regional_bytes)?;

    let stream_header = StreamHeader::read(&mut r)?;
    trace!(position = r.position(), "stream tables");
    let streams = StreamTables {
        unks: read_table(
            "streamUnk",
            &mut r,
            stream_header.unk_count as usize,
            StreamEntryUnk::read,
        )?,
        hash_to_name: read_table(
            "streamHashToName",
            &mut r,
            stream_header.stream_hash_count as usize,
            StreamHashToName::read,
        )?,
        name_to_hash: read_table(
            "streamNameToHash",
            &mut r,
            stream_header.stream_hash_count as usize,
            StreamNameToHash::read,
        )?,
        index_to_offset: read_table(
            "streamIndexToOffset",
            &mut r,
            stream_header.stream_index_to_offset_count as usize,
            StreamIndexToOffset::read,
        )?,
        offsets: read_table(
            "streamOffsets",
            &mut r,
            stream_header.stream_offset_count as usize,
            StreamOffset::read,
        )?,
    };

    let unk_count_1 = r.read_u32::<LittleEndian>()?;
    let unk_count_2 = r.read_u32::<LittleEndian>()?;
    let unknown_entries = read_table(
        "fileInfoUnknownTable",
        &mut r,
        unk_count_2 as usize,
        FileInfoUnknown::read,
    )?;
    let path_to_index_group = read_table(
        "filePathToIndexHashGroup",
        &mut r,
        unk_count_1 as usize,
        HashIndexGroup::read,
    )?;

    trace!(position = r.position(), "file path tables");
    let file_info_paths = read_table(
        "fileInfoPath",
        &mut r,
        header.file_info_path_count as usize,
        FileInfoPath::read,
    )?;
    let file_info_indices = read_table(
        "fileInfoIndex",
        &mut r,
        header.file_info_index_count as usize,
        FileInfoIndex::read,
    )?;

    trace!(position = r.position(), "directory tables");
    let directory_hash_group = read_table(
        "directoryHashGroup",
        &mut r,
        header.directory_count as usize,
        HashIndexGroup::read,
    )?;
    let directories = read_table(
        "directoryList",
        &mut r,
        header.directory_count as usize,
        DirectoryEntry::read,
    )?;
    let directory_offsets = read_table(
        "directoryOffsets",
        &mut r,
        (header.directory_offset_count_1 + header.directory_offset_count_2 + extra.folder)
            as usize,
        DirectoryOffset::read,
    )?;
    let directory_child_hash_group = read_table(
        "directoryChildHashGroup",
        &mut r,
        header.directory_hash_search_count as usize,
        HashIndexGroup::read,
    )?;

    trace!(position = r.position(), "file information tables");
    let file_infos = read_table(
        "fileInformation",
        &mut r,
        (header.file_info_count + header.sub_file_count_2 + extra.file_info) as usize,
        FileInfoV2::read,
    )?;
    let sub_indices = read_table(
        "fileInfoSubIndex",
        &mut r,
        (header.file_info_sub_index_count + header.sub_file_count_2 + extra.sub_index) as usize,
        FileInfoSubIndex::read,
    )?;
    let sub_files = read_table(
        "subFiles",
        &mut r,
        (header.sub_file_count + header.sub_file_count_2 + extra.sub_file) as usize,
        SubFileInfo::read,
    )?;

    debug!(
        files = file_infos.len(),
        sub_files = sub_files.len(),
        directories = directories.len(),
        streams = streams.name_to_hash.len(),
        "filesystem table parsed"
    );

    Ok(V2Tables {
        header,
        version,
        extra,
        regional_bytes,
        stream_header,
        streams,
        unknown_entries,
        path_to_index_group,
        file_info_paths,
        file_info_indices,
        directory_hash_group,
        directories,
        directory_offsets,
        directory_child_hash_group,
        file_infos,
        sub_indices,
        sub_files,
    })
}
