//! sfnt table directory.
//!
//! The outer container of a TrueType font: a 12-byte header followed by
//! 16-byte table records mapping a 4-byte tag to a byte range. Unknown
//! tags are kept but never consulted.

use std::collections::HashMap;
use std::fmt;

use crate::error::DecodeError;
use crate::reader::Reader;

/// Size of the sfnt header preceding the table records.
const HEADER_LEN: usize = 12;

/// Size of one table record.
const RECORD_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A 4-byte table tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const HEAD: Self = Self(*b"head");
    pub const MAXP: Self = Self(*b"maxp");
    pub const HHEA: Self = Self(*b"hhea");
    pub const HMTX: Self = Self(*b"hmtx");
    pub const LOCA: Self = Self(*b"loca");
    pub const GLYF: Self = Self(*b"glyf");
    pub const CMAP: Self = Self(*b"cmap");
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            // Non-ASCII tag bytes render as '?' rather than breaking output.
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

// ---------------------------------------------------------------------------
// Table records
// ---------------------------------------------------------------------------

/// Byte range of one table inside the font buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableInfo {
    pub offset: u32,
    pub length: u32,
}

/// Parsed table directory: tag → byte range.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    tables: HashMap<Tag, TableInfo>,
}

impl TableDirectory {
    /// Parse the sfnt header and all table records.
    ///
    /// The scaler type at offset 0 is read and ignored. Record ranges
    /// are taken at face value here; bounds are enforced when a table is
    /// actually read, so a buffer truncated inside a table fails with
    /// `Truncated` at that point rather than up front.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BadHeader`] if the header or a record does not fit.
    pub fn parse(reader: &Reader<'_>) -> Result<Self, DecodeError> {
        if reader.len() < HEADER_LEN {
            return Err(DecodeError::BadHeader);
        }
        let num_tables = reader
            .read_u16(4)
            .map_err(|_| DecodeError::BadHeader)? as usize;

        let mut tables = HashMap::with_capacity(num_tables);
        for i in 0..num_tables {
            let record = HEADER_LEN + i * RECORD_LEN;
            let tag_bytes = reader
                .slice(record, 4)
                .map_err(|_| DecodeError::BadHeader)?;
            let mut tag = [0u8; 4];
            tag.copy_from_slice(tag_bytes);
            // record + 4 is the checksum; ignored.
            let offset = reader
                .read_u32(record + 8)
                .map_err(|_| DecodeError::BadHeader)?;
            let length = reader
                .read_u32(record + 12)
                .map_err(|_| DecodeError::BadHeader)?;
            tables.insert(Tag(tag), TableInfo { offset, length });
        }

        Ok(Self { tables })
    }

    /// Look up a table's byte range, if present.
    #[must_use]
    pub fn info(&self, tag: Tag) -> Option<TableInfo> {
        self.tables.get(&tag).copied()
    }

    /// Look up a required table's byte range.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingTable`] if the tag is absent.
    pub fn require(&self, tag: Tag) -> Result<TableInfo, DecodeError> {
        self.info(tag).ok_or(DecodeError::MissingTable(tag))
    }

    /// Number of tables in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the directory holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a directory with the given (tag, offset, length) records,
    /// padded so every record range is in bounds.
    fn build(records: &[(&[u8; 4], u32, u32)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        data.extend_from_slice(&(records.len() as u16).to_be_bytes());
        data.extend_from_slice(&[0u8; 6]); // search params, unused
        for (tag, offset, length) in records {
            data.extend_from_slice(*tag);
            data.extend_from_slice(&0u32.to_be_bytes()); // checksum
            data.extend_from_slice(&offset.to_be_bytes());
            data.extend_from_slice(&length.to_be_bytes());
        }
        let max_end = records
            .iter()
            .map(|(_, o, l)| (*o + *l) as usize)
            .max()
            .unwrap_or(0);
        data.resize(data.len().max(max_end), 0);
        data
    }

    #[test]
    fn parses_records() {
        let data = build(&[(b"head", 100, 54), (b"wxyz", 160, 4)]);
        let dir = TableDirectory::parse(&Reader::new(&data)).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(
            dir.info(Tag::HEAD),
            Some(TableInfo {
                offset: 100,
                length: 54
            })
        );
        // Unknown tags are preserved.
        assert!(dir.info(Tag(*b"wxyz")).is_some());
    }

    #[test]
    fn missing_required_table() {
        let data = build(&[(b"head", 100, 54)]);
        let dir = TableDirectory::parse(&Reader::new(&data)).unwrap();
        assert_eq!(dir.require(Tag::GLYF), Err(DecodeError::MissingTable(Tag::GLYF)));
    }

    #[test]
    fn truncated_record_is_bad_header() {
        let mut data = build(&[(b"head", 100, 54)]);
        // Cut the record list itself short.
        data.truncate(20);
        let err = TableDirectory::parse(&Reader::new(&data)).unwrap_err();
        assert_eq!(err, DecodeError::BadHeader);
    }

    #[test]
    fn short_buffer_is_bad_header() {
        let err = TableDirectory::parse(&Reader::new(&[0u8; 4])).unwrap_err();
        assert_eq!(err, DecodeError::BadHeader);
    }

    #[test]
    fn tag_display() {
        assert_eq!(Tag::HEAD.to_string(), "head");
        assert_eq!(Tag([0x00, b'a', b'b', 0xFF]).to_string(), "?ab?");
    }
}
