//! A tiny TrueType font built in memory for tests.
//!
//! Every character from U+0021 up to U+FFFF maps to one filled box glyph,
//! space maps to an empty glyph. All glyphs advance 600 units on a
//! 1000-unit em, ascender 800, descender -200, so measurements agree with
//! `approximate_metrics`. The box spans x 50..550 and y 0..700.

use crate::font_registry::FontLibrary;

pub const FAMILY: &str = "Box";
pub const UNITS_PER_EM: u16 = 1000;
pub const ADVANCE: u16 = 600;
pub const BOX_LEFT: i16 = 50;
pub const BOX_RIGHT: i16 = 550;
pub const BOX_TOP: i16 = 700;

fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn head() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // font revision
    push_u32(&mut t, 0); // checksum adjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magic
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    push_i16(&mut t, 0);
    push_i16(&mut t, 0);
    push_i16(&mut t, BOX_RIGHT);
    push_i16(&mut t, BOX_TOP);
    push_u16(&mut t, 0); // mac style
    push_u16(&mut t, 8); // lowest rec ppem
    push_i16(&mut t, 2); // direction hint
    push_i16(&mut t, 0); // short loca offsets
    push_i16(&mut t, 0); // glyph data format
    t
}

fn hhea(number_of_metrics: u16) -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000);
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // line gap
    push_u16(&mut t, ADVANCE);
    push_i16(&mut t, 0);
    push_i16(&mut t, 0);
    push_i16(&mut t, BOX_RIGHT);
    push_i16(&mut t, 1); // caret slope rise
    push_i16(&mut t, 0);
    push_i16(&mut t, 0);
    t.extend_from_slice(&[0; 8]); // reserved
    push_i16(&mut t, 0); // metric data format
    push_u16(&mut t, number_of_metrics);
    t
}

fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0000_5000);
    push_u16(&mut t, num_glyphs);
    t
}

fn hmtx(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    for _ in 0..num_glyphs {
        push_u16(&mut t, ADVANCE);
        push_i16(&mut t, 0);
    }
    t
}

/// Many-to-one (format 13) cmap: space -> glyph 2, everything else -> glyph 1
fn cmap() -> Vec<u8> {
    let groups: [(u32, u32, u32); 2] = [(0x20, 0x20, 2), (0x21, 0xFFFF, 1)];

    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // one encoding record
    push_u16(&mut t, 3); // windows
    push_u16(&mut t, 10); // unicode full repertoire
    push_u32(&mut t, 12); // subtable offset

    push_u16(&mut t, 13);
    push_u16(&mut t, 0);
    push_u32(&mut t, 16 + 12 * groups.len() as u32);
    push_u32(&mut t, 0); // language
    push_u32(&mut t, groups.len() as u32);
    for (start, end, glyph) in groups {
        push_u32(&mut t, start);
        push_u32(&mut t, end);
        push_u32(&mut t, glyph);
    }
    t
}

/// One closed rectangular contour with on-curve points and 16-bit deltas
fn box_glyph() -> Vec<u8> {
    let mut g = Vec::new();
    push_i16(&mut g, 1); // contours
    push_i16(&mut g, BOX_LEFT);
    push_i16(&mut g, 0);
    push_i16(&mut g, BOX_RIGHT);
    push_i16(&mut g, BOX_TOP);
    push_u16(&mut g, 3); // last point index
    push_u16(&mut g, 0); // no instructions
    g.extend_from_slice(&[0x01; 4]);

    let width = BOX_RIGHT - BOX_LEFT;
    for dx in [BOX_LEFT, width, 0, -width] {
        push_i16(&mut g, dx);
    }
    for dy in [0, 0, BOX_TOP, 0] {
        push_i16(&mut g, dy);
    }
    g
}

/// Raw font bytes
pub fn box_font() -> Vec<u8> {
    let glyph = box_glyph();
    let glyph_len = glyph.len() as u16;

    // glyph 0 (.notdef) and glyph 2 (space) are empty
    let mut loca = Vec::new();
    for offset in [0, 0, glyph_len / 2, glyph_len / 2] {
        push_u16(&mut loca, offset);
    }

    let num_glyphs = 3;
    // sorted by tag
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", cmap()),
        (b"glyf", glyph),
        (b"head", head()),
        (b"hhea", hhea(num_glyphs)),
        (b"hmtx", hmtx(num_glyphs)),
        (b"loca", loca),
        (b"maxp", maxp(num_glyphs)),
    ];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 64); // search range
    push_u16(&mut font, 2); // entry selector
    push_u16(&mut font, 0); // range shift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0); // checksum
        push_u32(&mut font, offset as u32);
        push_u32(&mut font, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend_from_slice(&body);
    font
}

/// A library whose only (and default) family is the box font
pub fn box_library() -> FontLibrary {
    let mut library = FontLibrary::new();
    library
        .register(FAMILY, box_font())
        .expect("box font should parse");
    library
}
