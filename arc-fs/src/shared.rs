//! Shared-file grouping: which paths resolve to byte-identical
//! payloads.

use crate::error::Result;
use crate::resolve::canonical_sub_file_v2;
use crate::schema::V2Tables;
use std::collections::HashMap;
use tracing::debug;

/// Groups of file records keyed by their canonical sub-file index.
///
/// Built in a single pass over the modern file-record table right
/// after parsing. Legacy containers have no record table suitable for
/// grouping, so their index stays empty.
#[derive(Debug, Default)]
pub struct SharedFileIndex {
    groups: HashMap<usize, Vec<usize>>,
}

impl SharedFileIndex {
    pub fn build(tables: &V2Tables) -> Result<Self> {
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();

        for (record_index, info) in tables.file_infos.iter().enumerate() {
            let key = canonical_sub_file_v2(tables, record_index)?;
            let group = groups.entry(key).or_default();

            // Two records may carry the same path; keep one per path.
            let duplicate = group
                .iter()
                .any(|&other| tables.file_infos.as_slice()[other].path_index == info.path_index);
            if !duplicate {
                group.push(record_index);
            }
        }

        debug!(groups = groups.len(), "shared-file index built");
        Ok(Self { groups })
    }

    /// Record indices whose payload is the sub-file at `key`.
    pub fn group(&self, key: usize) -> &[usize] {
        self.groups.get(&key).map_or(&[], Vec::as_slice)
    }
}
