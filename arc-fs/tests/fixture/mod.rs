//! Synthetic container builders shared by the integration tests.
#![allow(dead_code)] // each test binary uses a subset of the fixtures
//!
//! Each builder writes a minimal but fully wired container to a
//! temporary file: real header, a table section in one of the stored
//! encodings, and payload bytes at the offsets the tables point at.

use arc_fs::types::{
    ARC_MAGIC, ArcHeader, CompressedTableHeader, DirectoryEntry, DirectoryOffset, FileInfoIndex,
    FileInfoPath, FileInfoSubIndex, FileInfoV1, FileInfoV2, FileSystemHeader, FileSystemHeaderV1,
    HashIndexGroup, HashMeta, StreamHashToName, StreamHeader, StreamIndexToOffset,
    StreamNameToHash, StreamOffset, SubFileInfo,
};
use arc_fs::{HashLabels, crc32c};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const V2_DATA_BASE: u64 = 0x1000_0000;
pub const V1_DATA_BASE: u64 = 0x1000;

pub const MODEL_PAYLOAD: &[u8] = b"MODELDATA";
pub const REGION_DEFAULT_PAYLOAD: &[u8] = b"REGIONXX";
pub const REGION_0_PAYLOAD: &[u8] = b"REGION00";
pub const REGION_1_PAYLOAD: &[u8] = b"REGION01";
pub const BGM_PAYLOAD: &[u8] = b"BGMAUDIO";
pub const VOICE_R0_PAYLOAD: &[u8] = b"VOICE_R0";
pub const VOICE_R1_PAYLOAD: &[u8] = b"VOICE_R1";
pub const MODEL_V1_PAYLOAD: &[u8] = b"MODELV1!!";

pub const BGM_PATH: &str = "stream:/sound/bgm.nus3audio";
pub const VOICE_PATH: &str = "stream:/sound/voice.nus3audio";

pub fn anim_plain() -> Vec<u8> {
    b"ANIMDATA".repeat(8)
}

pub struct Fixture {
    /// Keeps the container alive on disk for the test's duration.
    pub file: NamedTempFile,
    pub labels: Arc<HashLabels>,
}

/// Routes engine logs through the test harness; safe to call from
/// every test, only the first registration wins.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn labels() -> Arc<HashLabels> {
    let labels = Arc::new(HashLabels::new());
    labels.ensure_init([
        "fighter/",
        "model.bin",
        "anim.bin",
        "alias.bin",
        "region.bin",
        "copy.bin",
        ".bin",
        BGM_PATH,
        VOICE_PATH,
    ]);
    labels
}

fn meta(label: &str) -> HashMeta {
    HashMeta::new(crc32c(label.as_bytes()), 0, label.len() as u8)
}

fn write_at(f: &mut File, offset: u64, bytes: &[u8]) {
    f.seek(SeekFrom::Start(offset)).unwrap();
    f.write_all(bytes).unwrap();
}

/// Modern container: six file records under `fighter/` (plain,
/// compressed, redirect, regional, two payload-sharing copies) and
/// two stream records (one plain, one regional with clamping).
pub fn build_v2() -> Fixture {
    init_tracing();
    let anim_comp = zstd::encode_all(anim_plain().as_slice(), 3).unwrap();
    let table = v2_table(anim_comp.len() as u32);
    let comp_table = zstd::encode_all(table.as_slice(), 3).unwrap();

    let mut temp = NamedTempFile::new().unwrap();
    let f = temp.as_file_mut();

    ArcHeader {
        magic: ARC_MAGIC,
        file_system_offset: 0x100,
        file_system_search_offset: 0,
        file_data_offset: V2_DATA_BASE,
        file_data_offset_2: V2_DATA_BASE,
    }
    .write(f)
    .unwrap();

    f.seek(SeekFrom::Start(0x100)).unwrap();
    CompressedTableHeader {
        data_offset: 0x10,
        decomp_size: table.len() as u32,
        comp_size: comp_table.len() as u32,
        section_size: comp_table.len() as u32,
    }
    .write(f)
    .unwrap();
    f.write_all(&comp_table).unwrap();

    write_at(f, 0x2000, BGM_PAYLOAD);
    write_at(f, 0x2010, VOICE_R0_PAYLOAD);
    write_at(f, 0x2020, VOICE_R1_PAYLOAD);

    write_at(f, V2_DATA_BASE, MODEL_PAYLOAD);
    write_at(f, V2_DATA_BASE + 16, &anim_comp);
    write_at(f, V2_DATA_BASE + 128, REGION_DEFAULT_PAYLOAD);
    write_at(f, V2_DATA_BASE + 136, REGION_0_PAYLOAD);
    write_at(f, V2_DATA_BASE + 0x100, REGION_1_PAYLOAD);
    f.flush().unwrap();

    Fixture {
        file: temp,
        labels: labels(),
    }
}

/// Decompressed table bytes of the modern fixture, for byte-exact
/// comparisons against rebuilt sections.
pub fn v2_table_bytes() -> Vec<u8> {
    let anim_comp = zstd::encode_all(anim_plain().as_slice(), 3).unwrap();
    v2_table(anim_comp.len() as u32)
}

fn v2_table(anim_comp_size: u32) -> Vec<u8> {
    let mut buf = Vec::new();

    FileSystemHeader {
        table_file_size: 0,
        file_info_path_count: 6,
        file_info_index_count: 6,
        directory_count: 1,
        directory_offset_count_1: 2,
        directory_offset_count_2: 0,
        directory_hash_search_count: 0,
        file_info_count: 6,
        file_info_sub_index_count: 8,
        sub_file_count: 5,
        sub_file_count_2: 0,
        last_table_index: 0,
        unk: 0,
    }
    .write(&mut buf)
    .unwrap();
    buf.resize(0x3C, 0); // baseline version block
    buf.resize(0x3C + 0xE * 12, 0); // regional reservation block

    StreamHeader {
        unk_count: 0,
        stream_hash_count: 2,
        stream_index_to_offset_count: 7,
        stream_offset_count: 3,
    }
    .write(&mut buf)
    .unwrap();

    for i in 0..2u32 {
        StreamHashToName {
            hash: 0,
            name_index: i,
        }
        .write(&mut buf)
        .unwrap();
    }
    StreamNameToHash {
        hash: crc32c(BGM_PATH.as_bytes()),
        name_index: BGM_PATH.len() as u32,
        flags: 0,
    }
    .write(&mut buf)
    .unwrap();
    StreamNameToHash {
        hash: crc32c(VOICE_PATH.as_bytes()),
        name_index: (1 << 8) | VOICE_PATH.len() as u32,
        flags: 2,
    }
    .write(&mut buf)
    .unwrap();
    // Slot 0 is the plain stream; slots 1 and 2 the voice regions,
    // the rest padding so clamped regions stay in range.
    for file_index in [0u32, 1, 2, 1, 1, 1, 1] {
        StreamIndexToOffset { file_index }.write(&mut buf).unwrap();
    }
    for (size, offset) in [(8u64, 0x2000u64), (8, 0x2010), (8, 0x2020)] {
        StreamOffset { size, offset }.write(&mut buf).unwrap();
    }

    buf.extend_from_slice(&0u32.to_le_bytes()); // path-to-index group count
    buf.extend_from_slice(&0u32.to_le_bytes()); // unknown table count

    for name in ["model.bin", "anim.bin", "alias.bin", "region.bin", "copy.bin", "model.bin"] {
        let full = format!("fighter/{name}");
        FileInfoPath {
            path: meta(&full),
            extension: meta(".bin"),
            parent: meta("fighter/"),
            file_name: meta(name),
        }
        .write(&mut buf)
        .unwrap();
    }
    // Identity entries except record 2, which redirects to record 0.
    for target in [0u32, 1, 0, 3, 4, 5] {
        FileInfoIndex {
            directory_offset_index: 0,
            file_info_index: target,
        }
        .write(&mut buf)
        .unwrap();
    }

    HashIndexGroup {
        hash: crc32c(b"fighter/"),
        index: "fighter/".len() as u32,
    }
    .write(&mut buf)
    .unwrap();
    DirectoryEntry {
        full_path: HashMeta::new(crc32c(b"fighter/"), 0, "fighter/".len() as u8),
        name: HashMeta::default(),
        parent: HashMeta::default(),
        extension: HashMeta::default(),
        file_info_start: 0,
        file_info_count: 6,
        child_dir_start: 0,
        child_dir_count: 0,
        flags: 0,
    }
    .write(&mut buf)
    .unwrap();
    for offset in [0u64, 0x100] {
        DirectoryOffset {
            offset,
            ..Default::default()
        }
        .write(&mut buf)
        .unwrap();
    }

    let records = [
        (0u32, 0u32, 0u32, 0u32),
        (1, 1, 1, 0),
        (2, 2, 2, FileInfoV2::REDIRECT_FLAG),
        (3, 3, 3, FileInfoV2::REGIONAL_FLAG),
        (4, 4, 6, 0),
        (0, 5, 7, 0),
    ];
    for (path_index, index_index, sub_index_index, flags) in records {
        FileInfoV2 {
            path_index,
            index_index,
            sub_index_index,
            flags,
        }
        .write(&mut buf)
        .unwrap();
    }
    for (sub_file_index, directory_offset_index) in
        [(0u32, 0u32), (1, 0), (0, 0), (2, 0), (3, 0), (4, 1), (0, 0), (0, 0)]
    {
        FileInfoSubIndex {
            sub_file_index,
            directory_offset_index,
            file_info_index_and_flag: 0,
        }
        .write(&mut buf)
        .unwrap();
    }
    let sub_files = [
        (0u32, MODEL_PAYLOAD.len() as u32, MODEL_PAYLOAD.len() as u32),
        (4, anim_comp_size, anim_plain().len() as u32),
        (32, 8, 8),
        (34, 8, 8),
        (0, 8, 8),
    ];
    for (offset, comp_size, decomp_size) in sub_files {
        SubFileInfo {
            offset,
            comp_size,
            decomp_size,
            flags: 0,
        }
        .write(&mut buf)
        .unwrap();
    }

    buf
}

/// Legacy container: three file records (plain, redirect, regional)
/// and one stream record, with the table section stored raw.
pub fn build_v1() -> Fixture {
    init_tracing();
    let table = v1_table();

    let mut temp = NamedTempFile::new().unwrap();
    let f = temp.as_file_mut();

    ArcHeader {
        magic: ARC_MAGIC,
        file_system_offset: 0x100,
        file_system_search_offset: 0,
        file_data_offset: V1_DATA_BASE,
        file_data_offset_2: V1_DATA_BASE,
    }
    .write(f)
    .unwrap();

    f.seek(SeekFrom::Start(0x100)).unwrap();
    CompressedTableHeader {
        data_offset: 0,
        decomp_size: table.len() as u32,
        comp_size: table.len() as u32,
        section_size: table.len() as u32,
    }
    .write(f)
    .unwrap();
    f.write_all(&table).unwrap();

    write_at(f, V1_DATA_BASE, MODEL_V1_PAYLOAD);
    write_at(f, V1_DATA_BASE + 0x40, REGION_0_PAYLOAD);
    write_at(f, V1_DATA_BASE + 0x80, REGION_1_PAYLOAD);
    write_at(f, 0x2000, BGM_PAYLOAD);
    f.flush().unwrap();

    Fixture {
        file: temp,
        labels: labels(),
    }
}

fn v1_table() -> Vec<u8> {
    let mut buf = Vec::new();

    FileSystemHeaderV1 {
        part_1_count: 1,
        part_2_count: 1,
        music_file_count: 1,
        folder_count: 1,
        file_count_1: 3,
        file_count_2: 0,
        hash_folder_count: 0,
        file_info_count: 3,
        sub_file_count: 4,
        sub_file_count_2: 0,
    }
    .write(&mut buf)
    .unwrap();
    buf.resize(0x68, 0); // node-header prefix
    buf.resize(0x68 + 8, 0); // legacy hash table, one entry

    StreamNameToHash {
        hash: crc32c(BGM_PATH.as_bytes()),
        name_index: BGM_PATH.len() as u32,
        flags: 0,
    }
    .write(&mut buf)
    .unwrap();
    StreamIndexToOffset { file_index: 0 }.write(&mut buf).unwrap();
    StreamOffset {
        size: BGM_PAYLOAD.len() as u64,
        offset: 0x2000,
    }
    .write(&mut buf)
    .unwrap();

    let reserved_end = buf.len() + 0xC * 0xE;
    buf.resize(reserved_end, 0);

    DirectoryEntry {
        full_path: HashMeta::new(crc32c(b"fighter/"), 0, "fighter/".len() as u8),
        name: HashMeta::default(),
        parent: HashMeta::default(),
        extension: HashMeta::default(),
        file_info_start: 0,
        file_info_count: 3,
        child_dir_start: 0,
        child_dir_count: 0,
        flags: 0,
    }
    .write(&mut buf)
    .unwrap();
    for offset in [0u64, 0x40, 0x80] {
        DirectoryOffset {
            offset,
            ..Default::default()
        }
        .write(&mut buf)
        .unwrap();
    }

    let records = [
        ("model.bin", 0u32, 0u32, 0u32),
        ("alias.bin", 1, FileInfoV1::REDIRECT_MASK, 0),
        ("region.bin", 2, 0, 2 << 8),
    ];
    for (name, sub_file_index, flags, file_table_flag) in records {
        FileInfoV1 {
            parent: meta("fighter/"),
            file_name: meta(name),
            extension: meta(".bin"),
            sub_file_index,
            flags,
            directory_index: 0,
            file_table_flag,
        }
        .write(&mut buf)
        .unwrap();
    }
    let sub_files = [
        (0u32, MODEL_V1_PAYLOAD.len() as u32, MODEL_V1_PAYLOAD.len() as u32, 0u32),
        // Redirect target record index rides in the flags word.
        (0, 0, 0, 0),
        (0, 8, 8, 0),
        (0, 8, 8, 0),
    ];
    for (offset, comp_size, decomp_size, flags) in sub_files {
        SubFileInfo {
            offset,
            comp_size,
            decomp_size,
            flags,
        }
        .write(&mut buf)
        .unwrap();
    }

    buf
}
