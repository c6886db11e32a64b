//! Section codec: table-section decoding and payload decompression.
//!
//! Table sections come in three encodings, selected by the header's
//! data-offset field: a self-prefixed raw table, a Zstandard-
//! compressed table, or plain raw bytes. File payloads are compressed
//! individually and decompressed on demand against a caller-known
//! exact output length.

use crate::error::{Error, Result};
use crate::types::CompressedTableHeader;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// Reads exactly `len` bytes, reporting a truncated section when the
/// stream runs out early.
fn read_exact_or_truncated<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(Error::TruncatedTable {
            expected: len,
            actual: buf.len(),
        });
    }
    Ok(buf)
}

/// Decodes one table section at the reader's current position and
/// returns its fully decoded bytes.
pub fn decode_table<R: Read + Seek>(r: &mut R) -> Result<Vec<u8>> {
    let section_start = r.stream_position()?;
    let header_bytes = read_exact_or_truncated(r, CompressedTableHeader::SIZE)?;
    let header = CompressedTableHeader::read(&mut header_bytes.as_slice())?;

    if header.data_offset > 0x10 {
        // Self-prefixed raw table: the section begins with its own
        // 32-bit byte length.
        r.seek(SeekFrom::Start(section_start))?;
        let len = r.read_u32::<LittleEndian>()? as usize;
        r.seek(SeekFrom::Start(section_start))?;
        trace!("raw self-prefixed table section, {len} bytes");
        read_exact_or_truncated(r, len)
    } else if header.data_offset == 0x10 {
        let compressed = read_exact_or_truncated(r, header.comp_size as usize)?;
        let table = decompress_payload(&compressed, header.decomp_size as usize)?;
        debug!(
            "decompressed table section: {} -> {} bytes",
            header.comp_size, header.decomp_size
        );
        Ok(table)
    } else {
        trace!("raw table section, {} bytes", header.comp_size);
        read_exact_or_truncated(r, header.comp_size as usize)
    }
}

/// Decompresses one stored payload, verifying the exact output length.
pub fn decompress_payload(bytes: &[u8], expected: usize) -> Result<Vec<u8>> {
    let decompressed = zstd::decode_all(bytes)?;
    if decompressed.len() != expected {
        return Err(Error::Decompression {
            expected,
            actual: decompressed.len(),
        });
    }
    Ok(decompressed)
}

/// Compresses a rebuilt table at the given effort level.
pub fn compress_table(bytes: &[u8], level: i32) -> Result<Vec<u8>> {
    let compressed = zstd::encode_all(bytes, level)?;
    debug!(
        "compressed table: {} -> {} bytes (level {level})",
        bytes.len(),
        compressed.len()
    );
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn section_header(data_offset: u32, decomp: u32, comp: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        let header = CompressedTableHeader {
            data_offset,
            decomp_size: decomp,
            comp_size: comp,
            section_size: comp,
        };
        header.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn decodes_plain_section() {
        let payload = b"0123456789abcdef";
        let mut section = section_header(0, 0, payload.len() as u32);
        section.extend_from_slice(payload);

        let decoded = decode_table(&mut Cursor::new(section)).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decodes_compressed_section() {
        let table: Vec<u8> = (0..255u8).cycle().take(4096).collect();
        let compressed = zstd::encode_all(table.as_slice(), 3).unwrap();

        let mut section =
            section_header(0x10, table.len() as u32, compressed.len() as u32);
        section.extend_from_slice(&compressed);

        let decoded = decode_table(&mut Cursor::new(section)).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn decodes_self_prefixed_section() {
        // First u32 of the section doubles as the total byte length.
        let mut section = Vec::new();
        section.write_u32::<LittleEndian>(24).unwrap();
        while section.len() < 24 {
            section.push(section.len() as u8);
        }
        section.extend_from_slice(b"trailing junk");

        let decoded = decode_table(&mut Cursor::new(section.clone())).unwrap();
        assert_eq!(decoded, &section[..24]);
    }

    #[test]
    fn short_stream_is_truncated_error() {
        let section = section_header(0, 0, 64);
        match decode_table(&mut Cursor::new(section)) {
            Err(Error::TruncatedTable { expected: 64, actual: 0 }) => {}
            other => panic!("expected TruncatedTable, got {other:?}"),
        }
    }

    #[test]
    fn missing_header_is_truncated_error() {
        match decode_table(&mut Cursor::new(vec![0u8; 4])) {
            Err(Error::TruncatedTable { expected, actual: 4 }) => {
                assert_eq!(expected, CompressedTableHeader::SIZE);
            }
            other => panic!("expected TruncatedTable, got {other:?}"),
        }
    }

    #[test]
    fn payload_length_mismatch() {
        let compressed = zstd::encode_all(&b"hello world"[..], 3).unwrap();
        match decompress_payload(&compressed, 5) {
            Err(Error::Decompression { expected: 5, actual: 11 }) => {}
            other => panic!("expected Decompression, got {other:?}"),
        }
    }

    #[test]
    fn payload_round_trip() {
        let data = b"payload payload payload";
        let compressed = compress_table(data, 3).unwrap();
        assert_eq!(decompress_payload(&compressed, data.len()).unwrap(), data);
    }
}
