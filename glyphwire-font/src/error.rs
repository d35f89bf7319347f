//! Font decoding errors.

use std::fmt;

use crate::directory::Tag;

/// Errors that can occur while decoding a TrueType font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The sfnt header is malformed (bad magic, impossible table records).
    BadHeader,
    /// A read ran past the end of the buffer.
    Truncated,
    /// A required table is absent from the table directory.
    MissingTable(Tag),
    /// `loca` offsets are not monotone or point outside `glyf`.
    LocaInconsistent,
    /// The `cmap` table holds neither a format-12 nor a format-4 subtable.
    UnsupportedCmap,
    /// Compound glyph recursion revisited a glyph already on the stack.
    CompoundCycle(u16),
    /// Compound glyph recursion exceeded the depth cap.
    CompoundDepthExceeded(u16),
    /// A glyph id at or beyond `numGlyphs`.
    GidOutOfRange(u16),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadHeader => write!(f, "malformed sfnt header"),
            Self::Truncated => write!(f, "read past end of font data"),
            Self::MissingTable(tag) => write!(f, "required table '{tag}' missing"),
            Self::LocaInconsistent => write!(f, "loca offsets not monotone or out of range"),
            Self::UnsupportedCmap => write!(f, "no usable cmap subtable (format 4 or 12)"),
            Self::CompoundCycle(gid) => write!(f, "compound glyph cycle through gid {gid}"),
            Self::CompoundDepthExceeded(gid) => {
                write!(f, "compound glyph recursion too deep at gid {gid}")
            }
            Self::GidOutOfRange(gid) => write!(f, "glyph id {gid} out of range"),
        }
    }
}

impl std::error::Error for DecodeError {}
