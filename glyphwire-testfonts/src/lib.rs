//! Synthesized TrueType fixtures.
//!
//! Tests across the workspace need real font bytes without shipping
//! binary assets, so this crate assembles minimal, valid fonts in
//! memory: correct table directories, checksums, and search parameters,
//! accepted by external parsers as well as our own.
//!
//! Two canned fonts cover the interesting decode paths:
//! - [`micro`]: short loca, format-4 cmap, simple and compound glyphs
//!   (XY offsets, an F2Dot14 scale, point-anchor alignment), a blank
//!   space glyph, and a trailing advance that exercises the
//!   last-advance-repeats rule.
//! - [`wide`]: long loca and both format-12 and format-4 cmap
//!   subtables, including a supplementary-plane mapping.

pub mod sfnt;

pub use sfnt::{compound_glyph, simple_glyph, BeWriter, Component, GlyphPoint, Placement, SfntBuilder};

// ---------------------------------------------------------------------------
// Shared table builders
// ---------------------------------------------------------------------------

fn head_table(units_per_em: u16, long_loca: bool) -> Vec<u8> {
    let mut w = BeWriter::new();
    w.u32(0x0001_0000); // version
    w.u32(0); // fontRevision
    w.u32(0); // checkSumAdjustment
    w.u32(0x5F0F_3CF5); // magicNumber
    w.u16(0); // flags
    w.u16(units_per_em);
    w.zeros(16); // created + modified
    w.zeros(8); // xMin / yMin / xMax / yMax
    w.u16(0); // macStyle
    w.u16(8); // lowestRecPPEM
    w.i16(2); // fontDirectionHint
    w.i16(i16::from(long_loca));
    w.i16(0); // glyphDataFormat
    w.into_inner()
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut w = BeWriter::new();
    w.u32(0x0001_0000);
    w.u16(num_glyphs);
    w.zeros(26); // remaining maxp 1.0 fields
    w.into_inner()
}

fn hhea_table(ascent: i16, descent: i16, line_gap: i16, num_h_metrics: u16) -> Vec<u8> {
    let mut w = BeWriter::new();
    w.u32(0x0001_0000);
    w.i16(ascent);
    w.i16(descent);
    w.i16(line_gap);
    w.u16(2048); // advanceWidthMax
    w.zeros(6); // min bearings, xMaxExtent
    w.i16(1); // caretSlopeRise
    w.zeros(12); // caretSlopeRun, caretOffset, 4 reserved words
    w.i16(0); // metricDataFormat
    w.u16(num_h_metrics);
    w.into_inner()
}

fn hmtx_table(advances: &[u16], lsbs: &[i16]) -> Vec<u8> {
    let mut w = BeWriter::new();
    for (i, &advance) in advances.iter().enumerate() {
        w.u16(advance);
        w.i16(lsbs[i]);
    }
    for &lsb in &lsbs[advances.len()..] {
        w.i16(lsb);
    }
    w.into_inner()
}

/// Glyph data + matching loca offsets. Glyphs are padded to even sizes
/// so the short format's half-offsets are exact.
fn glyf_and_loca(glyphs: &[Vec<u8>], long_loca: bool) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for g in glyphs {
        glyf.extend_from_slice(g);
        while glyf.len() % 2 != 0 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }
    let mut loca = BeWriter::new();
    for &offset in &offsets {
        if long_loca {
            loca.u32(offset);
        } else {
            loca.u16((offset / 2) as u16);
        }
    }
    (glyf, loca.into_inner())
}

/// A format-4 subtable with one segment per mapping plus the sentinel.
fn cmap_format4(mappings: &[(u16, u16)]) -> Vec<u8> {
    let seg_count = (mappings.len() + 1) as u16;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;

    let mut w = BeWriter::new();
    w.u16(4);
    w.u16(16 + 8 * seg_count); // length
    w.u16(0); // language
    w.u16(seg_count * 2);
    w.u16(search_range);
    w.u16(entry_selector);
    w.u16(seg_count * 2 - search_range);
    for &(code, _) in mappings {
        w.u16(code); // endCode
    }
    w.u16(0xFFFF);
    w.u16(0); // reservedPad
    for &(code, _) in mappings {
        w.u16(code); // startCode
    }
    w.u16(0xFFFF);
    for &(code, gid) in mappings {
        w.u16(gid.wrapping_sub(code)); // idDelta, two's complement
    }
    w.u16(1);
    for _ in 0..seg_count {
        w.u16(0); // idRangeOffset
    }
    w.into_inner()
}

/// A format-12 subtable from (startChar, endChar, startGid) groups.
fn cmap_format12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut w = BeWriter::new();
    w.u16(12);
    w.u16(0); // reserved
    w.u32(16 + 12 * groups.len() as u32); // length
    w.u32(0); // language
    w.u32(groups.len() as u32);
    for &(start, end, gid) in groups {
        w.u32(start);
        w.u32(end);
        w.u32(gid);
    }
    w.into_inner()
}

/// Wrap subtables in a cmap table with (platform 3, encoding) records.
fn cmap_table(subtables: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let mut w = BeWriter::new();
    w.u16(0); // version
    w.u16(subtables.len() as u16);
    let mut offset = 4 + 8 * subtables.len() as u32;
    for (encoding, sub) in subtables {
        w.u16(3); // platform: Windows
        w.u16(*encoding);
        w.u32(offset);
        offset += sub.len() as u32;
    }
    for (_, sub) in subtables {
        w.bytes(sub);
    }
    w.into_inner()
}

// ---------------------------------------------------------------------------
// micro: the workhorse fixture
// ---------------------------------------------------------------------------

pub const MICRO_UPEM: u16 = 1000;
pub const MICRO_NUM_GLYPHS: u16 = 7;
/// Every stored advance; the space glyph inherits it via saturation.
pub const MICRO_ADVANCE: u16 = 1000;
pub const MICRO_ASCENT: i16 = 800;
pub const MICRO_DESCENT: i16 = -200;
pub const MICRO_LINE_GAP: i16 = 90;

pub const MICRO_GID_A: u16 = 1;
pub const MICRO_GID_O: u16 = 2;
pub const MICRO_GID_EACUTE: u16 = 3;
pub const MICRO_GID_ACUTE: u16 = 4;
pub const MICRO_GID_ANCHOR: u16 = 5;
pub const MICRO_GID_SPACE: u16 = 6;

/// Code points mapped by [`micro`]'s format-4 cmap.
pub const MICRO_MAPPINGS: &[(u16, u16)] = &[
    (0x20, MICRO_GID_SPACE),
    (0x41, MICRO_GID_A),
    (0x6F, MICRO_GID_O),
    (0xB4, MICRO_GID_ACUTE),
    (0xE9, MICRO_GID_EACUTE),
    (0x100, MICRO_GID_ANCHOR),
];

/// Build the `micro` font. See the crate docs for its contents.
#[must_use]
pub fn micro() -> Vec<u8> {
    // 'A': outer triangle plus a counter (reversed winding).
    let glyph_a = simple_glyph(&[
        &[(50, 0, true), (450, 0, true), (250, 700, true)],
        &[(250, 400, true), (300, 150, true), (200, 150, true)],
    ]);
    // 'o': quadratic ring, on-curve at the compass points, off-curve at
    // the corners.
    let glyph_o = simple_glyph(&[&[
        (500, 350, true),
        (500, 700, false),
        (250, 700, true),
        (0, 700, false),
        (0, 350, true),
        (0, 0, false),
        (250, 0, true),
        (500, 0, false),
    ]]);
    let glyph_acute = simple_glyph(&[&[
        (50, 750, true),
        (150, 750, true),
        (100, 900, true),
        (0, 900, true),
    ]]);
    let glyph_eacute = compound_glyph(&[
        Component {
            gid: MICRO_GID_O,
            placement: Placement::Offset(0, 0),
            scale: None,
        },
        Component {
            gid: MICRO_GID_ACUTE,
            placement: Placement::Offset(175, 0),
            scale: None,
        },
    ]);
    // Anchor-mode compound: the accent's first point is dragged onto the
    // ring's top point (index 2).
    let glyph_anchor = compound_glyph(&[
        Component {
            gid: MICRO_GID_O,
            placement: Placement::Offset(0, 0),
            scale: None,
        },
        Component {
            gid: MICRO_GID_ACUTE,
            placement: Placement::Anchor {
                component: 0,
                parent: 2,
            },
            scale: None,
        },
    ]);

    let glyphs = [
        Vec::new(), // .notdef
        glyph_a,
        glyph_o,
        glyph_eacute,
        glyph_acute,
        glyph_anchor,
        Vec::new(), // space
    ];
    let (glyf, loca) = glyf_and_loca(&glyphs, false);

    // numberOfHMetrics = 6 < numGlyphs: the space glyph's advance comes
    // from the last stored entry.
    let advances = [MICRO_ADVANCE; 6];
    let lsbs = [0i16; MICRO_NUM_GLYPHS as usize];

    let mut b = SfntBuilder::new();
    b.table(*b"head", head_table(MICRO_UPEM, false));
    b.table(*b"maxp", maxp_table(MICRO_NUM_GLYPHS));
    b.table(
        *b"hhea",
        hhea_table(MICRO_ASCENT, MICRO_DESCENT, MICRO_LINE_GAP, 6),
    );
    b.table(*b"hmtx", hmtx_table(&advances, &lsbs));
    b.table(*b"loca", loca);
    b.table(*b"glyf", glyf);
    b.table(*b"cmap", cmap_table(&[(1, cmap_format4(MICRO_MAPPINGS))]));
    b.build()
}

// ---------------------------------------------------------------------------
// wide: long loca + format-12 cmap
// ---------------------------------------------------------------------------

pub const WIDE_UPEM: u16 = 2048;
pub const WIDE_GID_A: u16 = 1;
pub const WIDE_GID_EMOJI: u16 = 2;
pub const WIDE_EMOJI_CP: u32 = 0x1F600;

/// Build the `wide` font: long loca, format-12 + format-4 cmap.
#[must_use]
pub fn wide() -> Vec<u8> {
    let glyph_box = simple_glyph(&[&[
        (100, 0, true),
        (1000, 0, true),
        (1000, 1400, true),
        (100, 1400, true),
    ]]);
    let glyph_emoji = simple_glyph(&[&[(0, 0, true), (400, 0, true), (200, 600, true)]]);

    let glyphs = [Vec::new(), glyph_box, glyph_emoji];
    let (glyf, loca) = glyf_and_loca(&glyphs, true);

    let format4 = cmap_format4(&[(0x41, WIDE_GID_A)]);
    let format12 = cmap_format12(&[
        (0x41, 0x41, u32::from(WIDE_GID_A)),
        (WIDE_EMOJI_CP, WIDE_EMOJI_CP, u32::from(WIDE_GID_EMOJI)),
    ]);

    let mut b = SfntBuilder::new();
    b.table(*b"head", head_table(WIDE_UPEM, true));
    b.table(*b"maxp", maxp_table(3));
    b.table(*b"hhea", hhea_table(1638, -410, 0, 3));
    b.table(*b"hmtx", hmtx_table(&[600, 1200, 1200], &[0, 100, 0]));
    b.table(*b"loca", loca);
    b.table(*b"glyf", glyf);
    b.table(
        *b"cmap",
        cmap_table(&[(10, format12), (1, format4)]),
    );
    b.build()
}
