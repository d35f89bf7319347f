//! Code point → glyph id resolution.
//!
//! The encoding records are walked once at load time; the first format-12
//! and the first format-4 subtables encountered are remembered. Format 12
//! is preferred because it covers code points beyond the BMP. Other
//! subtable formats are skipped.

use crate::error::DecodeError;
use crate::reader::Reader;

// ---------------------------------------------------------------------------
// Subtable representations
// ---------------------------------------------------------------------------

/// One format-12 sequential map group.
#[derive(Debug, Clone, Copy)]
struct Group {
    start_char: u32,
    end_char: u32,
    start_gid: u32,
}

/// Format 12: sorted, non-overlapping code point ranges.
#[derive(Debug, Clone)]
struct Format12 {
    groups: Vec<Group>,
}

impl Format12 {
    fn parse(r: &Reader<'_>, offset: usize) -> Result<Self, DecodeError> {
        let num_groups = r.read_u32(offset + 12)? as usize;
        // The count is untrusted; let the Vec grow instead of
        // preallocating whatever a corrupt header claims.
        let mut groups = Vec::with_capacity(num_groups.min(1024));
        for i in 0..num_groups {
            let base = offset + 16 + i * 12;
            groups.push(Group {
                start_char: r.read_u32(base)?,
                end_char: r.read_u32(base + 4)?,
                start_gid: r.read_u32(base + 8)?,
            });
        }
        Ok(Self { groups })
    }

    /// Whether the groups are sorted and non-overlapping, as the binary
    /// search requires.
    fn is_well_formed(&self) -> bool {
        self.groups.windows(2).all(|w| w[0].end_char < w[1].start_char)
            && self.groups.iter().all(|g| g.start_char <= g.end_char)
    }

    fn map(&self, cp: u32) -> u16 {
        let i = self.groups.partition_point(|g| g.end_char < cp);
        match self.groups.get(i) {
            Some(g) if g.start_char <= cp => (g.start_gid + (cp - g.start_char)) as u16,
            _ => 0,
        }
    }
}

/// Format 4: segmented BMP coverage with delta/range-offset indirection.
#[derive(Debug, Clone)]
struct Format4 {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    /// Subtable bytes from its start through the end of the `cmap` table;
    /// the glyph id array is dereferenced against this slice.
    data: Vec<u8>,
    /// Byte position of `idRangeOffset[0]` within `data`.
    range_offset_pos: usize,
}

impl Format4 {
    fn parse(r: &Reader<'_>, offset: usize) -> Result<Self, DecodeError> {
        let seg_count = usize::from(r.read_u16(offset + 6)?) / 2;
        let end_base = offset + 14;
        let start_base = end_base + seg_count * 2 + 2; // +2 skips reservedPad
        let delta_base = start_base + seg_count * 2;
        let range_base = delta_base + seg_count * 2;

        let mut end_codes = Vec::with_capacity(seg_count);
        let mut start_codes = Vec::with_capacity(seg_count);
        let mut id_deltas = Vec::with_capacity(seg_count);
        let mut id_range_offsets = Vec::with_capacity(seg_count);
        for i in 0..seg_count {
            end_codes.push(r.read_u16(end_base + i * 2)?);
            start_codes.push(r.read_u16(start_base + i * 2)?);
            id_deltas.push(r.read_i16(delta_base + i * 2)?);
            id_range_offsets.push(r.read_u16(range_base + i * 2)?);
        }

        // Keep everything from the subtable start so range-offset
        // dereferences can reach the trailing glyph id array.
        let data = r.slice(offset, r.len() - offset)?.to_vec();
        Ok(Self {
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            data,
            range_offset_pos: range_base - offset,
        })
    }

    fn map(&self, cp: u32) -> u16 {
        let Ok(cp) = u16::try_from(cp) else {
            return 0;
        };
        let i = self.end_codes.partition_point(|&end| end < cp);
        if i >= self.end_codes.len() || self.start_codes[i] > cp {
            return 0;
        }
        let delta = self.id_deltas[i] as u16;
        let range_offset = self.id_range_offsets[i];
        if range_offset == 0 {
            return cp.wrapping_add(delta);
        }
        // The stored offset is relative to the idRangeOffset entry's own
        // byte address.
        let addr = self.range_offset_pos
            + i * 2
            + usize::from(range_offset)
            + usize::from(cp - self.start_codes[i]) * 2;
        match Reader::new(&self.data).read_u16(addr) {
            Ok(0) | Err(_) => 0,
            Ok(g) => g.wrapping_add(delta),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves code points against the preferred available subtable.
#[derive(Debug, Clone)]
pub struct CmapResolver {
    format12: Option<Format12>,
    format4: Option<Format4>,
}

impl CmapResolver {
    /// Walk the encoding records of a `cmap` table.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Truncated`] on malformed record offsets;
    /// [`DecodeError::UnsupportedCmap`] when neither a format-12 nor a
    /// format-4 subtable is present.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let r = Reader::new(data);
        let num_records = usize::from(r.read_u16(2)?);

        let mut format12 = None;
        let mut format4 = None;
        for i in 0..num_records {
            let record = 4 + i * 8;
            let offset = r.read_u32(record + 4)? as usize;
            let format = r.read_u16(offset)?;
            match format {
                12 if format12.is_none() => {
                    let table = Format12::parse(&r, offset)?;
                    if table.is_well_formed() {
                        format12 = Some(table);
                    } else {
                        log::warn!("ignoring format-12 cmap subtable with unsorted groups");
                    }
                }
                4 if format4.is_none() => format4 = Some(Format4::parse(&r, offset)?),
                12 | 4 => {}
                other => log::debug!("skipping cmap subtable format {other}"),
            }
        }

        if format12.is_none() && format4.is_none() {
            return Err(DecodeError::UnsupportedCmap);
        }
        Ok(Self { format12, format4 })
    }

    /// Map a code point to a glyph id; 0 means "no glyph".
    #[must_use]
    pub fn map(&self, cp: u32) -> u16 {
        if let Some(ref f12) = self.format12 {
            f12.map(cp)
        } else if let Some(ref f4) = self.format4 {
            f4.map(cp)
        } else {
            0
        }
    }

    /// Map through the format-4 subtable only, if present. Used to check
    /// BMP agreement between the two formats.
    #[must_use]
    pub fn map_format4(&self, cp: u32) -> Option<u16> {
        self.format4.as_ref().map(|f4| f4.map(cp))
    }
}
