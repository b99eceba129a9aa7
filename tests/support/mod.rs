//! Shared fixtures for the integration suite.
//!
//! `tiny_font` builds a minimal but structurally valid TrueType font from
//! scratch (seven tables, one square glyph shared by every printable ASCII
//! character) so rendering can be exercised without shipping a binary font
//! fixture. `wrap_woff` packs any sfnt into an uncompressed WOFF container
//! for the decode path.

use fontcellar::CollectionConfig;
use std::net::TcpListener;
use std::path::Path;

const UNITS_PER_EM: u16 = 1000;
const NUM_GLYPHS: u16 = 96;
const GLYPH_LEN: usize = 34;

/// Config rooted at a scratch directory instead of the working tree.
pub fn test_config(releases_root: &Path) -> CollectionConfig {
    let mut config = CollectionConfig::new("17.6");
    config.releases_root = releases_root.to_path_buf();
    config
}

/// A local port that nothing is listening on right now.
pub fn free_port() -> u16 {
    let probe = TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    probe.local_addr().expect("local addr").port()
}

/// Minimal TrueType font: ASCII 0x20..=0x7E all map to copies of one square
/// glyph with a 500-unit advance; everything else falls back to the empty
/// .notdef.
pub fn tiny_font() -> Vec<u8> {
    let tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"cmap", cmap_table()),
        (*b"glyf", glyf_table()),
        (*b"head", head_table()),
        (*b"hhea", hhea_table()),
        (*b"hmtx", hmtx_table()),
        (*b"loca", loca_table()),
        (*b"maxp", maxp_table()),
    ];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000); // sfnt version
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 64); // searchRange for 7 tables
    push_u16(&mut font, 2); // entrySelector
    push_u16(&mut font, 48); // rangeShift

    let mut offset = 12 + tables.len() * 16;
    for (tag, data) in &tables {
        font.extend_from_slice(tag);
        push_u32(&mut font, 0); // checksum, not verified by the parser
        push_u32(&mut font, offset as u32);
        push_u32(&mut font, data.len() as u32);
        offset += data.len().div_ceil(4) * 4;
    }
    for (_, data) in &tables {
        font.extend_from_slice(data);
        while font.len() % 4 != 0 {
            font.push(0);
        }
    }
    font
}

/// Pack an sfnt into a WOFF (v1) container with every table stored
/// uncompressed.
pub fn wrap_woff(sfnt: &[u8]) -> Vec<u8> {
    let num_tables = u16::from_be_bytes([sfnt[4], sfnt[5]]) as usize;

    let mut woff = Vec::new();
    push_u32(&mut woff, 0x774F_4646); // 'wOFF'
    woff.extend_from_slice(&sfnt[0..4]); // flavor
    push_u32(&mut woff, 0); // total length, unused by the decoder
    push_u16(&mut woff, num_tables as u16);
    push_u16(&mut woff, 0); // reserved
    push_u32(&mut woff, 0); // totalSfntSize
    woff.extend_from_slice(&[0u8; 24]); // versions, metadata, private block

    let mut data_offset = 44 + num_tables * 20;
    let mut blobs: Vec<&[u8]> = Vec::new();
    for index in 0..num_tables {
        let entry = 12 + index * 16;
        let offset = be_u32(sfnt, entry + 8) as usize;
        let length = be_u32(sfnt, entry + 12) as usize;
        woff.extend_from_slice(&sfnt[entry..entry + 4]); // tag
        push_u32(&mut woff, data_offset as u32);
        push_u32(&mut woff, length as u32); // stored raw: comp == orig
        push_u32(&mut woff, length as u32);
        woff.extend_from_slice(&sfnt[entry + 4..entry + 8]); // checksum
        data_offset += length;
        blobs.push(&sfnt[offset..offset + length]);
    }
    for blob in blobs {
        woff.extend_from_slice(blob);
    }
    woff
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // fontRevision
    push_u32(&mut t, 0); // checkSumAdjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0u8; 16]); // created + modified
    push_i16(&mut t, 0); // xMin
    push_i16(&mut t, -200); // yMin
    push_i16(&mut t, 1000); // xMax
    push_i16(&mut t, 800); // yMax
    push_u16(&mut t, 0); // macStyle
    push_u16(&mut t, 8); // lowestRecPPEM
    push_i16(&mut t, 2); // fontDirectionHint
    push_i16(&mut t, 0); // indexToLocFormat: short loca
    push_i16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // lineGap
    push_u16(&mut t, 500); // advanceWidthMax
    push_i16(&mut t, 50); // minLeftSideBearing
    push_i16(&mut t, 50); // minRightSideBearing
    push_i16(&mut t, 450); // xMaxExtent
    push_i16(&mut t, 1); // caretSlopeRise
    push_i16(&mut t, 0); // caretSlopeRun
    push_i16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0u8; 8]); // reserved
    push_i16(&mut t, 0); // metricDataFormat
    push_u16(&mut t, NUM_GLYPHS); // numberOfHMetrics
    t
}

fn maxp_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u16(&mut t, NUM_GLYPHS);
    t.extend_from_slice(&[0u8; 26]); // remaining limits, unused
    t
}

fn cmap_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // one encoding record
    push_u16(&mut t, 3); // platform: Windows
    push_u16(&mut t, 1); // encoding: Unicode BMP
    push_u32(&mut t, 12); // subtable offset

    // Format 4, two segments: printable ASCII and the required 0xFFFF cap.
    push_u16(&mut t, 4); // format
    push_u16(&mut t, 32); // length
    push_u16(&mut t, 0); // language
    push_u16(&mut t, 4); // segCountX2
    push_u16(&mut t, 4); // searchRange
    push_u16(&mut t, 1); // entrySelector
    push_u16(&mut t, 0); // rangeShift
    push_u16(&mut t, 0x7E); // endCode[0]
    push_u16(&mut t, 0xFFFF); // endCode[1]
    push_u16(&mut t, 0); // reservedPad
    push_u16(&mut t, 0x20); // startCode[0]
    push_u16(&mut t, 0xFFFF); // startCode[1]
    push_u16(&mut t, 0xFFE1); // idDelta[0]: 0x20 maps to glyph 1
    push_u16(&mut t, 1); // idDelta[1]: 0xFFFF wraps to glyph 0
    push_u16(&mut t, 0); // idRangeOffset[0]
    push_u16(&mut t, 0); // idRangeOffset[1]
    t
}

// One simple glyph: a 400x700 square with four on-curve points.
fn square_glyph() -> Vec<u8> {
    let mut g = Vec::new();
    push_i16(&mut g, 1); // numberOfContours
    push_i16(&mut g, 50); // xMin
    push_i16(&mut g, 0); // yMin
    push_i16(&mut g, 450); // xMax
    push_i16(&mut g, 700); // yMax
    push_u16(&mut g, 3); // endPtsOfContours
    push_u16(&mut g, 0); // instructionLength
    g.extend_from_slice(&[1, 1, 1, 1]); // flags: on-curve, 16-bit deltas
    for dx in [50i16, 400, 0, -400] {
        push_i16(&mut g, dx);
    }
    for dy in [0i16, 0, 700, 0] {
        push_i16(&mut g, dy);
    }
    g
}

fn glyf_table() -> Vec<u8> {
    let glyph = square_glyph();
    assert_eq!(glyph.len(), GLYPH_LEN);
    let mut t = Vec::new();
    // Glyph 0 is empty; glyphs 1..NUM_GLYPHS each get their own copy so the
    // short loca offsets stay strictly increasing.
    for _ in 1..NUM_GLYPHS {
        t.extend_from_slice(&glyph);
    }
    t
}

fn loca_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 0); // glyph 0 start
    for index in 1..=NUM_GLYPHS as usize {
        // Stored divided by two in the short format.
        push_u16(&mut t, ((index - 1) * GLYPH_LEN / 2) as u16);
    }
    t
}

fn hmtx_table() -> Vec<u8> {
    let mut t = Vec::new();
    for _ in 0..NUM_GLYPHS {
        push_u16(&mut t, 500); // advanceWidth
        push_i16(&mut t, 50); // leftSideBearing
    }
    t
}

fn be_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, value: i16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}
