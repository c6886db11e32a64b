//! Offset resolution: from a file record and region selector to an
//! absolute byte range in the container.

use crate::error::{Error, Result};
use crate::schema::{StreamTables, V1Tables, V2Tables};
use crate::types::StreamNameToHash;
use tracing::trace;

/// Redirects in well-formed archives are a single level; anything
/// deeper than this is treated as a cycle.
const MAX_REDIRECT_DEPTH: usize = 8;

/// Stream records with this flag clamp out-of-range regions to 0.
const STREAM_FLAG_REGIONAL_CLAMPED: u32 = 2;
const STREAM_FLAG_REGIONAL: u32 = 1;

/// Highest region index accepted by clamped regional streams.
const MAX_STREAM_REGION: u32 = 5;

/// Final location of one payload inside the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedFile {
    pub offset: u64,
    pub comp_size: u32,
    pub decomp_size: u32,
}

/// Follows a modern record's redirect chain to its canonical record
/// index, bounded against cycles.
pub fn follow_redirects_v2(tables: &V2Tables, record_index: usize) -> Result<usize> {
    let mut index = record_index;
    let mut depth = 0;
    loop {
        let info = tables.file_infos.get(index)?;
        let target = tables.file_info_indices.get(info.index_index as usize)?;
        if !info.is_redirect() {
            return Ok(index);
        }
        if depth >= MAX_REDIRECT_DEPTH {
            return Err(Error::RedirectCycle {
                start: record_index,
            });
        }
        trace!(from = index, to = target.file_info_index, "following redirect");
        index = target.file_info_index as usize;
        depth += 1;
    }
}

/// Resolves a modern record to its payload geometry.
///
/// Regional records occupy `1 + region` extra consecutive sub-index
/// slots after their default entry.
pub fn resolve_v2(
    tables: &V2Tables,
    file_data_offset: u64,
    record_index: usize,
    region: u32,
) -> Result<ResolvedFile> {
    let index = follow_redirects_v2(tables, record_index)?;
    let info = tables.file_infos.get(index)?;

    let mut sub_index_index = info.sub_index_index as usize;
    if info.is_regional() {
        sub_index_index += 1 + region as usize;
    }

    let sub_index = tables.sub_indices.get(sub_index_index)?;
    let sub_file = tables.sub_files.get(sub_index.sub_file_index as usize)?;
    let directory_offset = tables
        .directory_offsets
        .get(sub_index.directory_offset_index as usize)?;

    Ok(ResolvedFile {
        offset: file_data_offset + directory_offset.offset + (u64::from(sub_file.offset) << 2),
        comp_size: sub_file.comp_size,
        decomp_size: sub_file.decomp_size,
    })
}

/// The canonical payload key of a modern record: its own sub-file
/// index, ignoring redirect and region.
pub fn canonical_sub_file_v2(tables: &V2Tables, record_index: usize) -> Result<usize> {
    let info = tables.file_infos.get(record_index)?;
    let sub_index = tables.sub_indices.get(info.sub_index_index as usize)?;
    Ok(sub_index.sub_file_index as usize)
}

/// Resolves a legacy record to its payload geometry.
pub fn resolve_v1(
    tables: &V1Tables,
    file_data_offset: u64,
    record_index: usize,
    region: u32,
) -> Result<ResolvedFile> {
    let mut index = record_index;
    let mut depth = 0;
    loop {
        let info = tables.file_infos.get(index)?;
        let sub_file = tables.sub_files.get(info.sub_file_index as usize)?;

        if info.is_redirect() {
            if depth >= MAX_REDIRECT_DEPTH {
                return Err(Error::RedirectCycle {
                    start: record_index,
                });
            }
            // The redirect target record index rides in the low bits
            // of the sub-file flags.
            index = (sub_file.flags & 0x00FF_FFFF) as usize;
            depth += 1;
            continue;
        }

        let directory = tables
            .directories
            .get((info.directory_index >> 8) as usize)?;
        let dir_offset_index = directory.directory_offset_index() as usize;

        let (sub_file, directory_offset) = if info.is_regional() {
            let regional = tables
                .sub_files
                .get(info.regional_sub_file_base() as usize + region as usize)?;
            let offset = tables
                .directory_offsets
                .get(dir_offset_index + 1 + region as usize)?;
            (regional, offset)
        } else {
            (sub_file, tables.directory_offsets.get(dir_offset_index)?)
        };

        return Ok(ResolvedFile {
            offset: file_data_offset
                + directory_offset.offset
                + (u64::from(sub_file.offset) << 2),
            comp_size: sub_file.comp_size,
            decomp_size: sub_file.decomp_size,
        });
    }
}

/// Resolves a stream-namespace record. Returns the payload location
/// (stream offsets are already absolute) and whether the record is
/// regional.
pub fn resolve_stream(
    streams: &StreamTables,
    entry: &StreamNameToHash,
    region: u32,
) -> Result<(ResolvedFile, bool)> {
    let (regional, region) = match entry.flags {
        STREAM_FLAG_REGIONAL => (true, region),
        STREAM_FLAG_REGIONAL_CLAMPED => {
            (true, if region > MAX_STREAM_REGION { 0 } else { region })
        }
        _ => (false, 0),
    };

    let slot = entry.offset_index() as usize + region as usize;
    let file_index = streams.index_to_offset.get(slot)?.file_index as usize;
    let offset = streams.offsets.get(file_index)?;

    Ok((
        ResolvedFile {
            offset: offset.offset,
            comp_size: offset.size as u32,
            decomp_size: offset.size as u32,
        },
        regional,
    ))
}
