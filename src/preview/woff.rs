//! WOFF container decoding.
//!
//! Downloaded web fonts may arrive wrapped in a WOFF container. The
//! rasterizer only understands raw sfnt (TrueType/OpenType) data, so the
//! container is unwrapped first: header and table directory are parsed, each
//! zlib-compressed table is inflated, and the original sfnt layout is
//! reconstructed with 4-byte-aligned tables. WOFF2 uses a Brotli transform of
//! the glyph data and is rejected rather than half-supported.

use crate::preview::PreviewError;
use flate2::read::ZlibDecoder;
use std::io::Read;

const WOFF_SIGNATURE: u32 = 0x774F_4646; // 'wOFF'
const WOFF2_SIGNATURE: u32 = 0x774F_4632; // 'wOF2'

const WOFF_HEADER_LEN: usize = 44;
const WOFF_DIR_ENTRY_LEN: usize = 20;
const SFNT_DIR_ENTRY_LEN: usize = 16;
// Caps the directory a hostile or corrupt file can make us allocate for.
const MAX_TABLES: u16 = 4096;

/// True when the data starts with the WOFF (v1) signature.
pub fn is_woff(data: &[u8]) -> bool {
    read_u32(data, 0) == Some(WOFF_SIGNATURE)
}

/// True when the data starts with the WOFF2 signature.
pub fn is_woff2(data: &[u8]) -> bool {
    read_u32(data, 0) == Some(WOFF2_SIGNATURE)
}

struct TableEntry {
    tag: u32,
    checksum: u32,
    data: Vec<u8>,
}

/// Unwrap a WOFF (v1) container back into sfnt bytes.
pub fn decode_woff(data: &[u8]) -> Result<Vec<u8>, PreviewError> {
    if !is_woff(data) {
        return Err(decode_error("missing WOFF signature"));
    }
    if data.len() < WOFF_HEADER_LEN {
        return Err(decode_error("truncated WOFF header"));
    }

    let flavor = read_u32(data, 4).ok_or_else(|| decode_error("truncated WOFF header"))?;
    let num_tables = read_u16(data, 12).ok_or_else(|| decode_error("truncated WOFF header"))?;
    if num_tables == 0 || num_tables > MAX_TABLES {
        return Err(decode_error(&format!("implausible table count {num_tables}")));
    }

    let mut tables = Vec::with_capacity(num_tables as usize);
    for index in 0..num_tables as usize {
        let entry_at = WOFF_HEADER_LEN + index * WOFF_DIR_ENTRY_LEN;
        let tag = read_u32(data, entry_at)
            .ok_or_else(|| decode_error("truncated table directory"))?;
        let offset = read_u32(data, entry_at + 4)
            .ok_or_else(|| decode_error("truncated table directory"))? as usize;
        let comp_length = read_u32(data, entry_at + 8)
            .ok_or_else(|| decode_error("truncated table directory"))? as usize;
        let orig_length = read_u32(data, entry_at + 12)
            .ok_or_else(|| decode_error("truncated table directory"))? as usize;
        let checksum = read_u32(data, entry_at + 16)
            .ok_or_else(|| decode_error("truncated table directory"))?;

        let compressed = data
            .get(offset..offset + comp_length)
            .ok_or_else(|| decode_error("table data out of bounds"))?;
        let table = if comp_length == orig_length {
            compressed.to_vec()
        } else {
            inflate_table(compressed, orig_length)?
        };
        tables.push(TableEntry {
            tag,
            checksum,
            data: table,
        });
    }

    Ok(rebuild_sfnt(flavor, &tables))
}

fn inflate_table(compressed: &[u8], orig_length: usize) -> Result<Vec<u8>, PreviewError> {
    let mut table = Vec::with_capacity(orig_length);
    ZlibDecoder::new(compressed)
        .read_to_end(&mut table)
        .map_err(|err| decode_error(&format!("inflating table: {err}")))?;
    if table.len() != orig_length {
        return Err(decode_error(&format!(
            "table inflated to {} bytes, directory says {orig_length}",
            table.len()
        )));
    }
    Ok(table)
}

/// Lay the tables back out as an sfnt file: offset table, 16-byte directory
/// entries, then table data padded to 4-byte boundaries.
fn rebuild_sfnt(flavor: u32, tables: &[TableEntry]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = (u16::BITS - 1 - num_tables.leading_zeros()) as u16;
    let search_range = 16u16 << entry_selector;
    let range_shift = num_tables * 16 - search_range;

    let dir_len = 12 + tables.len() * SFNT_DIR_ENTRY_LEN;
    let total: usize = dir_len + tables.iter().map(|t| padded(t.data.len())).sum::<usize>();
    let mut sfnt = Vec::with_capacity(total);
    sfnt.extend_from_slice(&flavor.to_be_bytes());
    sfnt.extend_from_slice(&num_tables.to_be_bytes());
    sfnt.extend_from_slice(&search_range.to_be_bytes());
    sfnt.extend_from_slice(&entry_selector.to_be_bytes());
    sfnt.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = dir_len;
    for table in tables {
        sfnt.extend_from_slice(&table.tag.to_be_bytes());
        sfnt.extend_from_slice(&table.checksum.to_be_bytes());
        sfnt.extend_from_slice(&(offset as u32).to_be_bytes());
        sfnt.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        offset += padded(table.data.len());
    }
    for table in tables {
        sfnt.extend_from_slice(&table.data);
        sfnt.resize(sfnt.len() + padded(table.data.len()) - table.data.len(), 0);
    }
    sfnt
}

fn padded(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn decode_error(message: &str) -> PreviewError {
    PreviewError::Decode(message.to_string())
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}
