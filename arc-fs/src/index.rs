//! Path lookup structures built once after parsing.

use crate::error::Result;
use crate::schema::{FileSystem, V2Tables};
use crate::types::{FileInfoV1, StreamNameToHash};
use arc_dict::HashLabels;
use std::collections::HashMap;
use tracing::debug;

/// Prefix the label registry uses for unresolved hashes; a file name
/// still carrying it gets the extension label appended.
const UNRESOLVED_PREFIX: &str = "0x";

/// O(1) lookup structures: path string to file-record index and
/// CRC-32C of the path to stream-record index.
#[derive(Debug, Default)]
pub struct PathIndex {
    path_to_file: HashMap<String, usize>,
    crc_to_stream: HashMap<u32, usize>,
}

impl PathIndex {
    /// Builds the index and the materialized path lists in one linear
    /// pass over the parsed tables.
    ///
    /// Duplicate paths are tolerated; the later record wins.
    pub fn build(
        fs: &FileSystem,
        labels: &HashLabels,
    ) -> Result<(Self, Vec<String>, Vec<String>)> {
        let file_paths = file_path_list(fs, labels)?;
        let stream_paths = stream_path_list(fs, labels);

        let mut index = Self {
            path_to_file: HashMap::with_capacity(file_paths.len()),
            crc_to_stream: HashMap::with_capacity(fs.streams().name_to_hash.len()),
        };
        for (i, path) in file_paths.iter().enumerate() {
            index.path_to_file.insert(path.clone(), i);
        }
        for (i, entry) in fs.streams().name_to_hash.iter().enumerate() {
            index.crc_to_stream.insert(entry.hash, i);
        }

        debug!(
            files = index.path_to_file.len(),
            streams = index.crc_to_stream.len(),
            "path index built"
        );
        Ok((index, file_paths, stream_paths))
    }

    /// File-record index for a path, if present.
    pub fn file_record(&self, path: &str) -> Option<usize> {
        self.path_to_file.get(path).copied()
    }

    /// Stream-record index for a path CRC, if present.
    pub fn stream_record(&self, crc: u32) -> Option<usize> {
        self.crc_to_stream.get(&crc).copied()
    }
}

fn file_path_list(fs: &FileSystem, labels: &HashLabels) -> Result<Vec<String>> {
    match fs {
        FileSystem::V1(tables) => Ok(tables
            .file_infos
            .iter()
            .map(|info| v1_record_path(info, labels))
            .collect()),
        FileSystem::V2(tables) => {
            let mut paths = Vec::with_capacity(tables.file_infos.len());
            for info in tables.file_infos.iter() {
                paths.push(v2_record_path(tables, info.path_index as usize, labels)?);
            }
            Ok(paths)
        }
    }
}

fn stream_path_list(fs: &FileSystem, labels: &HashLabels) -> Vec<String> {
    fs.streams()
        .name_to_hash
        .iter()
        .map(|entry| stream_record_path(entry, labels))
        .collect()
}

/// Reconstructs the full path of a modern record: parent label plus
/// file-name label, with the extension label appended when the file
/// name did not resolve.
pub fn v2_record_path(
    tables: &V2Tables,
    path_index: usize,
    labels: &HashLabels,
) -> Result<String> {
    let path = tables.file_info_paths.get(path_index)?;

    let parent = labels.resolve(path.parent.hash, path.parent.len_hint());
    let mut file_name = labels.resolve(path.file_name.hash, path.file_name.len_hint());
    if file_name.starts_with(UNRESOLVED_PREFIX) {
        file_name.push_str(&labels.resolve(path.extension.hash, 0));
    }

    Ok(parent + &file_name)
}

/// Reconstructs the full path of a legacy record from its inline
/// hashed components.
pub fn v1_record_path(info: &FileInfoV1, labels: &HashLabels) -> String {
    let parent = labels.resolve(info.parent.hash, info.parent.len_hint());
    let mut file_name = labels.resolve(info.file_name.hash, info.file_name.len_hint());
    if file_name.starts_with(UNRESOLVED_PREFIX) {
        file_name.push_str(&labels.resolve(info.extension.hash, 0));
    }

    parent + &file_name
}

/// Reconstructs a stream-namespace path.
pub fn stream_record_path(entry: &StreamNameToHash, labels: &HashLabels) -> String {
    labels.resolve(entry.hash, entry.len_hint())
}
