//! Re-serialization of a modern filesystem table set.
//!
//! Writes the tables back in the exact order the parser consumes
//! them, so an unmodified table set serializes to the exact bytes it
//! was parsed from. The stored headers are written verbatim; callers
//! that edit table lengths must update the header counts themselves.

use crate::error::Result;
use crate::schema::V2Tables;
use crate::types::{Table, VERSION_V2};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;
use tracing::debug;

/// Resume offset of the table region when the extra-count block is
/// absent; the gap after the base header is zero padding.
const BASELINE_TABLE_START: usize = 0x3C;

fn write_all<T, W, F>(w: &mut W, table: &Table<T>, write_one: F) -> std::io::Result<()>
where
    W: Write,
    F: Fn(&T, &mut W) -> std::io::Result<()>,
{
    for item in table.iter() {
        write_one(item, w)?;
    }
    Ok(())
}

/// Serializes the table set back into its decompressed section
/// layout.
pub fn write_v2_tables(tables: &V2Tables) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    tables.header.write(&mut buf)?;

    if tables.version == VERSION_V2 {
        buf.resize(BASELINE_TABLE_START, 0);
    } else {
        buf.write_u32::<LittleEndian>(tables.version)?;
        buf.write_u32::<LittleEndian>(tables.extra.folder)?;
        buf.write_u32::<LittleEndian>(tables.extra.file_info)?;
        buf.write_all(&[0u8; 8])?;
        buf.write_u32::<LittleEndian>(tables.extra.sub_index)?;
        buf.write_u32::<LittleEndian>(tables.extra.sub_file)?;
    }

    buf.write_all(&tables.regional_bytes)?;

    tables.stream_header.write(&mut buf)?;

    write_all(&mut buf, &tables.streams.unks, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.streams.hash_to_name, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.streams.name_to_hash, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.streams.index_to_offset, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.streams.offsets, |e, w| e.write(w))?;

    buf.write_u32::<LittleEndian>(tables.path_to_index_group.len() as u32)?;
    buf.write_u32::<LittleEndian>(tables.unknown_entries.len() as u32)?;
    write_all(&mut buf, &tables.unknown_entries, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.path_to_index_group, |e, w| e.write(w))?;

    write_all(&mut buf, &tables.file_info_paths, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.file_info_indices, |e, w| e.write(w))?;

    write_all(&mut buf, &tables.directory_hash_group, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.directories, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.directory_offsets, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.directory_child_hash_group, |e, w| e.write(w))?;

    write_all(&mut buf, &tables.file_infos, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.sub_indices, |e, w| e.write(w))?;
    write_all(&mut buf, &tables.sub_files, |e, w| e.write(w))?;

    debug!(bytes = buf.len(), "filesystem table serialized");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::v2;
    use crate::types::{FileSystemHeader, StreamHeader, SubFileInfo, Table};

    fn empty_table_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        FileSystemHeader::default().write(&mut buf).unwrap();
        buf.resize(BASELINE_TABLE_START, 0);
        buf.extend_from_slice(&[0u8; 0xE * 12]);
        StreamHeader::default().write(&mut buf).unwrap();
        buf.extend_from_slice(&[0u8; 8]);
        buf
    }

    #[test]
    fn empty_table_set_round_trips() {
        let bytes = empty_table_bytes();
        let tables = v2::parse(&bytes).unwrap();
        let written = write_v2_tables(&tables).unwrap();
        assert_eq!(written, bytes);
    }

    #[test]
    fn added_records_are_serialized() {
        let mut tables = v2::parse(&empty_table_bytes()).unwrap();
        tables.sub_files = Table::new(
            "subFiles",
            vec![SubFileInfo {
                offset: 1,
                comp_size: 8,
                decomp_size: 8,
                flags: 0,
            }],
        );
        let written = write_v2_tables(&tables).unwrap();
        assert_eq!(written.len(), empty_table_bytes().len() + 16);
    }
}
