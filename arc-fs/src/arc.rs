//! The archive facade: opens a container, owns the parsed tables and
//! derived indices, and serves listing, metadata, and extraction
//! queries.

use crate::error::{Error, Result};
use crate::index::{PathIndex, v1_record_path, v2_record_path};
use crate::rebuild;
use crate::resolve::{
    ResolvedFile, canonical_sub_file_v2, follow_redirects_v2, resolve_stream, resolve_v1,
    resolve_v2,
};
use crate::schema::{FileSystem, v1, v2};
use crate::section;
use crate::shared::SharedFileIndex;
use crate::types::{ARC_MAGIC, ArcHeader};
use arc_dict::{HashLabels, crc32c};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Metadata for one file, all-zero when the path is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileInformation {
    pub offset: u64,
    pub comp_size: u32,
    pub decomp_size: u32,
    pub regional: bool,
}

impl FileInformation {
    fn from_resolved(resolved: ResolvedFile, regional: bool) -> Self {
        Self {
            offset: resolved.offset,
            comp_size: resolved.comp_size,
            decomp_size: resolved.decomp_size,
            regional,
        }
    }
}

/// One directory's resolved listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub child_directories: Vec<String>,
    pub files: Vec<String>,
}

/// Everything owned once a container parsed successfully.
struct LoadedArchive {
    header: ArcHeader,
    fs: FileSystem,
    index: PathIndex,
    shared: SharedFileIndex,
    file_paths: Vec<String>,
    stream_paths: Vec<String>,
}

/// An opened ARC container.
///
/// All tables and derived indices are immutable after
/// [`open`](Self::open); queries and extraction are safe to call from
/// concurrent readers without locking. Each extraction performs an
/// independent positioned read with its own file handle.
pub struct ArcFile {
    container_path: PathBuf,
    labels: Arc<HashLabels>,
    loaded: Option<LoadedArchive>,
}

impl ArcFile {
    /// Opens a container and parses its filesystem tables.
    ///
    /// A container too small to hold a header yields an accessor with
    /// [`is_initialized`](Self::is_initialized) `false` rather than an
    /// error, so callers can probe files without exception-style
    /// control flow. A wrong magic is a hard failure.
    pub fn open(container_path: impl AsRef<Path>, labels: Arc<HashLabels>) -> Result<Self> {
        let container_path = container_path.as_ref().to_path_buf();
        let file = File::open(&container_path)?;

        if file.metadata()?.len() < ArcHeader::SIZE as u64 {
            warn!(path = %container_path.display(), "container smaller than header, not an archive");
            return Ok(Self {
                container_path,
                labels,
                loaded: None,
            });
        }

        let mut reader = BufReader::new(file);
        let header = ArcHeader::read(&mut reader)?;
        if header.magic != ARC_MAGIC {
            return Err(Error::BadMagic {
                found: header.magic,
            });
        }

        if !labels.is_initialized() {
            warn!("label registry not initialized; paths will render as hash placeholders");
        }

        reader.seek(SeekFrom::Start(header.file_system_offset))?;
        let table = section::decode_table(&mut reader)?;

        let fs = if header.is_legacy() {
            FileSystem::V1(v1::parse(&table)?)
        } else {
            FileSystem::V2(v2::parse(&table)?)
        };

        let (index, file_paths, stream_paths) = PathIndex::build(&fs, &labels)?;
        let shared = match &fs {
            FileSystem::V2(tables) => SharedFileIndex::build(tables)?,
            FileSystem::V1(_) => SharedFileIndex::default(),
        };

        info!(
            path = %container_path.display(),
            version = format_args!("{:#x}", fs.version()),
            files = file_paths.len(),
            streams = stream_paths.len(),
            "archive opened"
        );

        Ok(Self {
            container_path,
            labels,
            loaded: Some(LoadedArchive {
                header,
                fs,
                index,
                shared,
                file_paths,
                stream_paths,
            }),
        })
    }

    /// `false` when the container was too small to be an archive;
    /// every query on an uninitialized accessor returns empty/zero.
    pub fn is_initialized(&self) -> bool {
        self.loaded.is_some()
    }

    /// Filesystem version constant, 0 when uninitialized.
    pub fn version(&self) -> u32 {
        self.loaded.as_ref().map_or(0, |l| l.fs.version())
    }

    /// Base offset of the file-data region.
    pub fn file_data_offset(&self) -> u64 {
        self.loaded.as_ref().map_or(0, |l| l.header.file_data_offset)
    }

    /// All regular-namespace paths, in table order.
    pub fn list_files(&self) -> &[String] {
        self.loaded.as_ref().map_or(&[], |l| &l.file_paths)
    }

    /// All stream-namespace paths, in table order.
    pub fn list_stream_files(&self) -> &[String] {
        self.loaded.as_ref().map_or(&[], |l| &l.stream_paths)
    }

    /// Lazy iteration over file records, for collaborators that visit
    /// only a subset and do not want full path materialization.
    pub fn records(&self) -> impl Iterator<Item = FileRecord<'_>> {
        let count = self.loaded.as_ref().map_or(0, |l| l.fs.file_count());
        (0..count).map(move |index| FileRecord { arc: self, index })
    }

    /// Looks up a path in both namespaces and resolves its location.
    ///
    /// Unknown paths yield an all-zero result by design; callers
    /// distinguish "not found" by the zero sizes.
    pub fn get_file_information(&self, path: &str, region: u32) -> Result<FileInformation> {
        let Some(loaded) = &self.loaded else {
            return Ok(FileInformation::default());
        };

        if let Some(record) = loaded.index.file_record(path) {
            let resolved = self.resolve_record(loaded, record, region)?;
            return Ok(FileInformation::from_resolved(resolved, self.is_regional(path)));
        }

        if let Some(stream) = loaded.index.stream_record(crc32c(path.as_bytes())) {
            let entry = loaded.fs.streams().name_to_hash.get(stream)?;
            let (resolved, regional) = resolve_stream(loaded.fs.streams(), entry, region)?;
            return Ok(FileInformation::from_resolved(resolved, regional));
        }

        debug!(path, "path not present in either namespace");
        Ok(FileInformation::default())
    }

    /// Returns the decompressed contents of a file, or the stored
    /// bytes unchanged when the payload is stored raw.
    pub fn get_file(&self, path: &str, region: u32) -> Result<Vec<u8>> {
        let information = self.get_file_information(path, region)?;
        let stored = self.read_section(information.offset, information.comp_size as usize)?;

        if information.decomp_size > 0 && information.decomp_size != information.comp_size {
            return section::decompress_payload(&stored, information.decomp_size as usize);
        }
        Ok(stored)
    }

    /// Returns the stored bytes of a file unmodified.
    pub fn get_file_compressed(&self, path: &str, region: u32) -> Result<Vec<u8>> {
        let information = self.get_file_information(path, region)?;
        self.read_section(information.offset, information.comp_size as usize)
    }

    /// `true` if the record behind `path` is an alias that resolves
    /// through the redirect table. Unknown paths are `false`.
    pub fn is_redirected(&self, path: &str) -> bool {
        let Some((loaded, record)) = self.lookup(path) else {
            return false;
        };
        match &loaded.fs {
            FileSystem::V1(t) => t
                .file_infos
                .get(record)
                .is_ok_and(|info| info.is_redirect()),
            FileSystem::V2(t) => t
                .file_infos
                .get(record)
                .is_ok_and(|info| info.is_redirect()),
        }
    }

    /// `true` if `path` has per-region payload variants. Unknown
    /// paths are `false`.
    pub fn is_regional(&self, path: &str) -> bool {
        let Some((loaded, record)) = self.lookup(path) else {
            return false;
        };
        match &loaded.fs {
            FileSystem::V1(t) => t
                .file_infos
                .get(record)
                .is_ok_and(|info| info.is_regional()),
            FileSystem::V2(t) => t
                .file_infos
                .get(record)
                .is_ok_and(|info| info.is_regional()),
        }
    }

    /// All paths whose payload is byte-identical to `path`'s, sorted,
    /// including `path` itself. Empty for unknown paths and legacy
    /// containers.
    pub fn get_shared_files(&self, path: &str, _region: u32) -> Result<Vec<String>> {
        let Some(loaded) = &self.loaded else {
            return Ok(Vec::new());
        };
        let Some(tables) = loaded.fs.as_v2() else {
            return Ok(Vec::new());
        };
        let Some(record) = loaded.index.file_record(path) else {
            return Ok(Vec::new());
        };

        let key = canonical_sub_file_v2(tables, record)?;
        let mut paths = Vec::new();
        for &member in loaded.shared.group(key) {
            let info = tables.file_infos.get(member)?;
            paths.push(v2_record_path(tables, info.path_index as usize, &self.labels)?);
        }
        paths.sort();
        Ok(paths)
    }

    /// Resolves a directory path to its child directories and files.
    ///
    /// `None` when the directory is unknown or the container is
    /// legacy (which has no directory hash registry).
    pub fn directory_info(&self, path: &str) -> Result<Option<DirectoryListing>> {
        let Some(loaded) = &self.loaded else {
            return Ok(None);
        };
        let Some(tables) = loaded.fs.as_v2() else {
            return Ok(None);
        };

        let hash = crc32c(path.as_bytes());
        let Some(group) = tables
            .directory_hash_group
            .iter()
            .find(|group| group.hash == hash)
        else {
            return Ok(None);
        };

        let directory = tables.directories.get(group.target_index() as usize)?;

        let mut child_directories = Vec::with_capacity(directory.child_dir_count as usize);
        for i in directory.child_dir_start..directory.child_dir_start + directory.child_dir_count
        {
            let child = tables.directory_child_hash_group.get(i as usize)?;
            child_directories.push(self.labels.resolve(child.hash, child.len_hint()));
        }

        let mut files = Vec::with_capacity(directory.file_info_count as usize);
        for i in
            directory.file_info_start..directory.file_info_start + directory.file_info_count
        {
            let resolved = follow_redirects_v2(tables, i as usize)?;
            let info = tables.file_infos.get(resolved)?;
            files.push(v2_record_path(tables, info.path_index as usize, &self.labels)?);
        }

        Ok(Some(DirectoryListing {
            child_directories,
            files,
        }))
    }

    /// Highest absolute payload offset referenced by the file tables.
    pub fn max_data_offset(&self) -> Result<u64> {
        let Some(loaded) = &self.loaded else {
            return Ok(0);
        };
        let base = loaded.header.file_data_offset;

        let mut max = 0u64;
        match &loaded.fs {
            FileSystem::V2(t) => {
                for info in t.file_infos.iter() {
                    let sub_index = t.sub_indices.get(info.sub_index_index as usize)?;
                    let sub_file = t.sub_files.get(sub_index.sub_file_index as usize)?;
                    let dir = t
                        .directory_offsets
                        .get(sub_index.directory_offset_index as usize)?;
                    max = max.max(base + dir.offset + (u64::from(sub_file.offset) << 2));
                }
            }
            FileSystem::V1(t) => {
                for info in t.file_infos.iter() {
                    let sub_file = t.sub_files.get(info.sub_file_index as usize)?;
                    let directory = t.directories.get((info.directory_index >> 8) as usize)?;
                    let dir = t
                        .directory_offsets
                        .get(directory.directory_offset_index() as usize)?;
                    max = max.max(base + dir.offset + (u64::from(sub_file.offset) << 2));
                }
            }
        }
        Ok(max)
    }

    /// Serializes the filesystem tables back into their section
    /// layout and compresses the result.
    ///
    /// Best-effort only: the output is not round-trip verified.
    /// Legacy containers have no write path.
    pub fn rebuild_table_bytes(&self, level: i32) -> Result<Vec<u8>> {
        let Some(loaded) = &self.loaded else {
            return Err(Error::NotImplemented);
        };
        match &loaded.fs {
            FileSystem::V2(tables) => {
                let raw = rebuild::write_v2_tables(tables)?;
                section::compress_table(&raw, level)
            }
            FileSystem::V1(_) => Err(Error::NotImplemented),
        }
    }

    fn lookup(&self, path: &str) -> Option<(&LoadedArchive, usize)> {
        let loaded = self.loaded.as_ref()?;
        let record = loaded.index.file_record(path)?;
        Some((loaded, record))
    }

    fn resolve_record(
        &self,
        loaded: &LoadedArchive,
        record: usize,
        region: u32,
    ) -> Result<ResolvedFile> {
        match &loaded.fs {
            FileSystem::V1(t) => resolve_v1(t, loaded.header.file_data_offset, record, region),
            FileSystem::V2(t) => resolve_v2(t, loaded.header.file_data_offset, record, region),
        }
    }

    /// Positioned read of one byte range with an independent handle,
    /// so concurrent extractions never observe each other's seek
    /// position.
    fn read_section(&self, offset: u64, size: usize) -> Result<Vec<u8>> {
        if self.loaded.is_none() || size == 0 {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.container_path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; size];
        file.read_exact(&mut data)?;
        Ok(data)
    }
}

/// A lazily materialized view of one file record.
pub struct FileRecord<'a> {
    arc: &'a ArcFile,
    index: usize,
}

impl FileRecord<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reconstructs this record's path on demand.
    pub fn path(&self) -> Result<String> {
        let Some(loaded) = self.arc.loaded.as_ref() else {
            return Ok(String::new());
        };
        match &loaded.fs {
            FileSystem::V1(t) => Ok(v1_record_path(t.file_infos.get(self.index)?, &self.arc.labels)),
            FileSystem::V2(t) => {
                let info = t.file_infos.get(self.index)?;
                v2_record_path(t, info.path_index as usize, &self.arc.labels)
            }
        }
    }

    /// Resolves this record's payload location.
    pub fn information(&self, region: u32) -> Result<FileInformation> {
        let Some(loaded) = self.arc.loaded.as_ref() else {
            return Ok(FileInformation::default());
        };
        let resolved = self.arc.resolve_record(loaded, self.index, region)?;
        let regional = match &loaded.fs {
            FileSystem::V1(t) => t.file_infos.get(self.index)?.is_regional(),
            FileSystem::V2(t) => t.file_infos.get(self.index)?.is_regional(),
        };
        Ok(FileInformation::from_resolved(resolved, regional))
    }
}
