//! Raw on-disk record types for the ARC filesystem tables.
//!
//! Every table is a dense array of one of these fixed-layout records,
//! little-endian, decoded field by field. Records never hold pointers;
//! cross-table references are zero-based integer indices resolved
//! through the bounds-checked [`Table`] wrapper.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Container magic, first 8 bytes of every ARC file.
pub const ARC_MAGIC: u64 = 0xABCD_EF98_7654_3210;

/// `file_data_offset` values below this mark a legacy (V1) container.
pub const LEGACY_DATA_OFFSET_THRESHOLD: u64 = 0x1000_0000;

/// Filesystem version constant for legacy containers.
pub const VERSION_V1: u32 = 0x0001_0000;

/// Baseline filesystem version for modern containers without the
/// extra-count block.
pub const VERSION_V2: u32 = 0x0002_0000;

/// A hash column paired with its metadata word: the low 8 bits of
/// `meta` are the label length hint, the upper 24 bits an index whose
/// meaning depends on the owning table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashMeta {
    pub hash: u32,
    pub meta: u32,
}

impl HashMeta {
    pub const SIZE: usize = 8;

    pub fn new(hash: u32, index: u32, len_hint: u8) -> Self {
        Self {
            hash,
            meta: (index << 8) | u32::from(len_hint),
        }
    }

    pub fn len_hint(self) -> u8 {
        (self.meta & 0xFF) as u8
    }

    pub fn index(self) -> u32 {
        self.meta >> 8
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u32::<LittleEndian>()?,
            meta: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.hash)?;
        w.write_u32::<LittleEndian>(self.meta)
    }
}

/// Container-level header at file offset 0.
#[derive(Debug, Clone, Copy)]
pub struct ArcHeader {
    pub magic: u64,
    pub file_system_offset: u64,
    pub file_system_search_offset: u64,
    pub file_data_offset: u64,
    pub file_data_offset_2: u64,
}

impl ArcHeader {
    pub const SIZE: usize = 0x28;

    /// `true` if the data-offset field marks a legacy container.
    pub fn is_legacy(&self) -> bool {
        self.file_data_offset < LEGACY_DATA_OFFSET_THRESHOLD
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            magic: r.read_u64::<LittleEndian>()?,
            file_system_offset: r.read_u64::<LittleEndian>()?,
            file_system_search_offset: r.read_u64::<LittleEndian>()?,
            file_data_offset: r.read_u64::<LittleEndian>()?,
            file_data_offset_2: r.read_u64::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u64::<LittleEndian>(self.magic)?;
        w.write_u64::<LittleEndian>(self.file_system_offset)?;
        w.write_u64::<LittleEndian>(self.file_system_search_offset)?;
        w.write_u64::<LittleEndian>(self.file_data_offset)?;
        w.write_u64::<LittleEndian>(self.file_data_offset_2)
    }
}

/// Header preceding every stored table section.
#[derive(Debug, Clone, Copy)]
pub struct CompressedTableHeader {
    pub data_offset: u32,
    pub decomp_size: u32,
    pub comp_size: u32,
    pub section_size: u32,
}

impl CompressedTableHeader {
    pub const SIZE: usize = 0x10;

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            data_offset: r.read_u32::<LittleEndian>()?,
            decomp_size: r.read_u32::<LittleEndian>()?,
            comp_size: r.read_u32::<LittleEndian>()?,
            section_size: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.data_offset)?;
        w.write_u32::<LittleEndian>(self.decomp_size)?;
        w.write_u32::<LittleEndian>(self.comp_size)?;
        w.write_u32::<LittleEndian>(self.section_size)
    }
}

/// Table-set sizing for the modern filesystem schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemHeader {
    pub table_file_size: u32,
    pub file_info_path_count: u32,
    pub file_info_index_count: u32,
    pub directory_count: u32,
    pub directory_offset_count_1: u32,
    pub directory_offset_count_2: u32,
    pub directory_hash_search_count: u32,
    pub file_info_count: u32,
    pub file_info_sub_index_count: u32,
    pub sub_file_count: u32,
    pub sub_file_count_2: u32,
    pub last_table_index: u32,
    pub unk: u32,
}

impl FileSystemHeader {
    pub const SIZE: usize = 0x34;

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            table_file_size: r.read_u32::<LittleEndian>()?,
            file_info_path_count: r.read_u32::<LittleEndian>()?,
            file_info_index_count: r.read_u32::<LittleEndian>()?,
            directory_count: r.read_u32::<LittleEndian>()?,
            directory_offset_count_1: r.read_u32::<LittleEndian>()?,
            directory_offset_count_2: r.read_u32::<LittleEndian>()?,
            directory_hash_search_count: r.read_u32::<LittleEndian>()?,
            file_info_count: r.read_u32::<LittleEndian>()?,
            file_info_sub_index_count: r.read_u32::<LittleEndian>()?,
            sub_file_count: r.read_u32::<LittleEndian>()?,
            sub_file_count_2: r.read_u32::<LittleEndian>()?,
            last_table_index: r.read_u32::<LittleEndian>()?,
            unk: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for v in [
            self.table_file_size,
            self.file_info_path_count,
            self.file_info_index_count,
            self.directory_count,
            self.directory_offset_count_1,
            self.directory_offset_count_2,
            self.directory_hash_search_count,
            self.file_info_count,
            self.file_info_sub_index_count,
            self.sub_file_count,
            self.sub_file_count_2,
            self.last_table_index,
            self.unk,
        ] {
            w.write_u32::<LittleEndian>(v)?;
        }
        Ok(())
    }
}

/// Table-set sizing for the legacy filesystem schema ("node header").
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemHeaderV1 {
    pub part_1_count: u32,
    pub part_2_count: u32,
    pub music_file_count: u32,
    pub folder_count: u32,
    pub file_count_1: u32,
    pub file_count_2: u32,
    pub hash_folder_count: u32,
    pub file_info_count: u32,
    pub sub_file_count: u32,
    pub sub_file_count_2: u32,
}

impl FileSystemHeaderV1 {
    /// The prefix region reserved for the node header; parsing always
    /// resumes at this offset regardless of the counts read.
    pub const PREFIX_SIZE: usize = 0x68;

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            part_1_count: r.read_u32::<LittleEndian>()?,
            part_2_count: r.read_u32::<LittleEndian>()?,
            music_file_count: r.read_u32::<LittleEndian>()?,
            folder_count: r.read_u32::<LittleEndian>()?,
            file_count_1: r.read_u32::<LittleEndian>()?,
            file_count_2: r.read_u32::<LittleEndian>()?,
            hash_folder_count: r.read_u32::<LittleEndian>()?,
            file_info_count: r.read_u32::<LittleEndian>()?,
            sub_file_count: r.read_u32::<LittleEndian>()?,
            sub_file_count_2: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for v in [
            self.part_1_count,
            self.part_2_count,
            self.music_file_count,
            self.folder_count,
            self.file_count_1,
            self.file_count_2,
            self.hash_folder_count,
            self.file_info_count,
            self.sub_file_count,
            self.sub_file_count_2,
        ] {
            w.write_u32::<LittleEndian>(v)?;
        }
        Ok(())
    }
}

/// Counts for the five stream-namespace tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamHeader {
    pub unk_count: u32,
    pub stream_hash_count: u32,
    pub stream_index_to_offset_count: u32,
    pub stream_offset_count: u32,
}

impl StreamHeader {
    pub const SIZE: usize = 0x10;

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            unk_count: r.read_u32::<LittleEndian>()?,
            stream_hash_count: r.read_u32::<LittleEndian>()?,
            stream_index_to_offset_count: r.read_u32::<LittleEndian>()?,
            stream_offset_count: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.unk_count)?;
        w.write_u32::<LittleEndian>(self.stream_hash_count)?;
        w.write_u32::<LittleEndian>(self.stream_index_to_offset_count)?;
        w.write_u32::<LittleEndian>(self.stream_offset_count)
    }
}

/// Unidentified stream sub-table entry, carried only for rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamEntryUnk {
    pub hash: u32,
    pub meta: u32,
    pub unk: u32,
}

impl StreamEntryUnk {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u32::<LittleEndian>()?,
            meta: r.read_u32::<LittleEndian>()?,
            unk: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.hash)?;
        w.write_u32::<LittleEndian>(self.meta)?;
        w.write_u32::<LittleEndian>(self.unk)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StreamHashToName {
    pub hash: u32,
    pub name_index: u32,
}

impl StreamHashToName {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u32::<LittleEndian>()?,
            name_index: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.hash)?;
        w.write_u32::<LittleEndian>(self.name_index)
    }
}

/// Stream-namespace record, looked up by the CRC-32C of the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamNameToHash {
    pub hash: u32,
    /// Low 8 bits: label length hint; upper 24: index into the
    /// stream index-to-offset table.
    pub name_index: u32,
    /// 1 or 2 marks a regional stream.
    pub flags: u32,
}

impl StreamNameToHash {
    pub fn len_hint(&self) -> u8 {
        (self.name_index & 0xFF) as u8
    }

    pub fn offset_index(&self) -> u32 {
        self.name_index >> 8
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u32::<LittleEndian>()?,
            name_index: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.hash)?;
        w.write_u32::<LittleEndian>(self.name_index)?;
        w.write_u32::<LittleEndian>(self.flags)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StreamIndexToOffset {
    pub file_index: u32,
}

impl StreamIndexToOffset {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            file_index: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.file_index)
    }
}

/// Final stream payload location; offsets here are absolute.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOffset {
    pub size: u64,
    pub offset: u64,
}

impl StreamOffset {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            size: r.read_u64::<LittleEndian>()?,
            offset: r.read_u64::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u64::<LittleEndian>(self.size)?;
        w.write_u64::<LittleEndian>(self.offset)
    }
}

/// Hash plus packed length/index word, used by several lookup tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashIndexGroup {
    pub hash: u32,
    /// Low 8 bits: label length; upper 24: index into the owning
    /// table's target.
    pub index: u32,
}

impl HashIndexGroup {
    pub fn len_hint(&self) -> u8 {
        (self.index & 0xFF) as u8
    }

    pub fn target_index(&self) -> u32 {
        self.index >> 8
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: r.read_u32::<LittleEndian>()?,
            index: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.hash)?;
        w.write_u32::<LittleEndian>(self.index)
    }
}

/// Unidentified file-information side table, carried only for rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoUnknown {
    pub unk: [u32; 4],
}

impl FileInfoUnknown {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        let mut unk = [0u32; 4];
        for v in &mut unk {
            *v = r.read_u32::<LittleEndian>()?;
        }
        Ok(Self { unk })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for v in self.unk {
            w.write_u32::<LittleEndian>(v)?;
        }
        Ok(())
    }
}

/// Hashed path components of one logical file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoPath {
    pub path: HashMeta,
    pub extension: HashMeta,
    pub parent: HashMeta,
    pub file_name: HashMeta,
}

impl FileInfoPath {
    pub fn directory_index(&self) -> u32 {
        self.path.index()
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            path: HashMeta::read(r)?,
            extension: HashMeta::read(r)?,
            parent: HashMeta::read(r)?,
            file_name: HashMeta::read(r)?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.path.write(w)?;
        self.extension.write(w)?;
        self.parent.write(w)?;
        self.file_name.write(w)
    }
}

/// Redirect target table entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoIndex {
    pub directory_offset_index: u32,
    pub file_info_index: u32,
}

impl FileInfoIndex {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            directory_offset_index: r.read_u32::<LittleEndian>()?,
            file_info_index: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.directory_offset_index)?;
        w.write_u32::<LittleEndian>(self.file_info_index)
    }
}

/// One directory: half-open child/file ranges into the child hash
/// group and file-info tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryEntry {
    pub full_path: HashMeta,
    pub name: HashMeta,
    pub parent: HashMeta,
    pub extension: HashMeta,
    pub file_info_start: u32,
    pub file_info_count: u32,
    pub child_dir_start: u32,
    pub child_dir_count: u32,
    pub flags: u32,
}

impl DirectoryEntry {
    pub const SIZE: usize = 0x34;

    /// Index into the directory-offset table (upper 24 bits of the
    /// full-path metadata word).
    pub fn directory_offset_index(&self) -> u32 {
        self.full_path.index()
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            full_path: HashMeta::read(r)?,
            name: HashMeta::read(r)?,
            parent: HashMeta::read(r)?,
            extension: HashMeta::read(r)?,
            file_info_start: r.read_u32::<LittleEndian>()?,
            file_info_count: r.read_u32::<LittleEndian>()?,
            child_dir_start: r.read_u32::<LittleEndian>()?,
            child_dir_count: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.full_path.write(w)?;
        self.name.write(w)?;
        self.parent.write(w)?;
        self.extension.write(w)?;
        w.write_u32::<LittleEndian>(self.file_info_start)?;
        w.write_u32::<LittleEndian>(self.file_info_count)?;
        w.write_u32::<LittleEndian>(self.child_dir_start)?;
        w.write_u32::<LittleEndian>(self.child_dir_count)?;
        w.write_u32::<LittleEndian>(self.flags)
    }
}

/// Per-directory (and per-region) payload base offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryOffset {
    pub offset: u64,
    pub decomp_size: u32,
    pub size: u32,
    pub sub_data_start_index: u32,
    pub sub_data_count: u32,
    pub redirect_index: u32,
}

impl DirectoryOffset {
    pub const SIZE: usize = 0x1C;

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            offset: r.read_u64::<LittleEndian>()?,
            decomp_size: r.read_u32::<LittleEndian>()?,
            size: r.read_u32::<LittleEndian>()?,
            sub_data_start_index: r.read_u32::<LittleEndian>()?,
            sub_data_count: r.read_u32::<LittleEndian>()?,
            redirect_index: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u64::<LittleEndian>(self.offset)?;
        w.write_u32::<LittleEndian>(self.decomp_size)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u32::<LittleEndian>(self.sub_data_start_index)?;
        w.write_u32::<LittleEndian>(self.sub_data_count)?;
        w.write_u32::<LittleEndian>(self.redirect_index)
    }
}

/// Modern-schema file record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoV2 {
    pub path_index: u32,
    pub index_index: u32,
    pub sub_index_index: u32,
    pub flags: u32,
}

impl FileInfoV2 {
    pub const REDIRECT_FLAG: u32 = 0x10;
    pub const REGIONAL_FLAG: u32 = 0x8000;

    pub fn is_redirect(&self) -> bool {
        self.flags & Self::REDIRECT_FLAG == Self::REDIRECT_FLAG
    }

    pub fn is_regional(&self) -> bool {
        self.flags & Self::REGIONAL_FLAG == Self::REGIONAL_FLAG
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            path_index: r.read_u32::<LittleEndian>()?,
            index_index: r.read_u32::<LittleEndian>()?,
            sub_index_index: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.path_index)?;
        w.write_u32::<LittleEndian>(self.index_index)?;
        w.write_u32::<LittleEndian>(self.sub_index_index)?;
        w.write_u32::<LittleEndian>(self.flags)
    }
}

/// Indirection from a file record to its payload descriptor and
/// directory base offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoSubIndex {
    pub sub_file_index: u32,
    pub directory_offset_index: u32,
    pub file_info_index_and_flag: u32,
}

impl FileInfoSubIndex {
    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            sub_file_index: r.read_u32::<LittleEndian>()?,
            directory_offset_index: r.read_u32::<LittleEndian>()?,
            file_info_index_and_flag: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.sub_file_index)?;
        w.write_u32::<LittleEndian>(self.directory_offset_index)?;
        w.write_u32::<LittleEndian>(self.file_info_index_and_flag)
    }
}

/// Payload geometry. `offset` is stored in 4-byte units relative to
/// the owning directory offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubFileInfo {
    pub offset: u32,
    pub comp_size: u32,
    pub decomp_size: u32,
    pub flags: u32,
}

impl SubFileInfo {
    /// Stored uncompressed when the two sizes agree.
    pub fn is_stored_raw(&self) -> bool {
        self.comp_size == self.decomp_size
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            offset: r.read_u32::<LittleEndian>()?,
            comp_size: r.read_u32::<LittleEndian>()?,
            decomp_size: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_u32::<LittleEndian>(self.offset)?;
        w.write_u32::<LittleEndian>(self.comp_size)?;
        w.write_u32::<LittleEndian>(self.decomp_size)?;
        w.write_u32::<LittleEndian>(self.flags)
    }
}

/// Legacy-schema file record; carries its own hashed path components
/// instead of a path-table index.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInfoV1 {
    pub parent: HashMeta,
    pub file_name: HashMeta,
    pub extension: HashMeta,
    pub sub_file_index: u32,
    pub flags: u32,
    /// Upper 24 bits index the directory list.
    pub directory_index: u32,
    /// Upper 24 bits, when non-zero, are the base sub-file index of
    /// the regional variants.
    pub file_table_flag: u32,
}

impl FileInfoV1 {
    pub const REDIRECT_MASK: u32 = 0x0030_0000;

    pub fn is_redirect(&self) -> bool {
        self.flags & Self::REDIRECT_MASK == Self::REDIRECT_MASK
    }

    pub fn is_regional(&self) -> bool {
        self.file_table_flag >> 8 > 0
    }

    pub fn regional_sub_file_base(&self) -> u32 {
        self.file_table_flag >> 8
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            parent: HashMeta::read(r)?,
            file_name: HashMeta::read(r)?,
            extension: HashMeta::read(r)?,
            sub_file_index: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
            directory_index: r.read_u32::<LittleEndian>()?,
            file_table_flag: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.parent.write(w)?;
        self.file_name.write(w)?;
        self.extension.write(w)?;
        w.write_u32::<LittleEndian>(self.sub_file_index)?;
        w.write_u32::<LittleEndian>(self.flags)?;
        w.write_u32::<LittleEndian>(self.directory_index)?;
        w.write_u32::<LittleEndian>(self.file_table_flag)
    }
}

/// A named, bounds-checked table of records.
///
/// Cross-table references in the ARC format are raw integer indices;
/// routing every access through `get` turns a corrupt index into an
/// [`Error::IndexOutOfRange`] naming the offending table instead of a
/// panic.
#[derive(Debug)]
pub struct Table<T> {
    name: &'static str,
    items: Vec<T>,
}

impl<T> Table<T> {
    pub fn new(name: &'static str, items: Vec<T>) -> Self {
        Self { name, items }
    }

    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            table: self.name,
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

/// Reads `count` consecutive records into a named table.
pub fn read_table<T, R, F>(
    name: &'static str,
    r: &mut R,
    count: usize,
    read_one: F,
) -> std::io::Result<Table<T>>
where
    R: Read,
    F: Fn(&mut R) -> std::io::Result<T>,
{
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read_one(r)?);
    }
    Ok(Table::new(name, items))
}
