//! Fixed-layout metric tables: `head`, `maxp`, `hhea`, `loca`, `hmtx`.
//!
//! These tables are small and read eagerly at load time. Only the fields
//! the engine consumes are extracted; everything else is skipped by
//! offset.

use crate::error::DecodeError;
use crate::reader::Reader;

// ---------------------------------------------------------------------------
// head / maxp / hhea
// ---------------------------------------------------------------------------

/// The two `loca` entry encodings selected by `head.indexToLocFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    /// Entries are `u16` values storing `offset / 2`.
    Short,
    /// Entries are raw `u32` offsets.
    Long,
}

/// Fields extracted from the `head` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadData {
    pub units_per_em: u16,
    pub index_to_loc_format: LocaFormat,
}

impl HeadData {
    /// Read `unitsPerEm` (offset 18) and `indexToLocFormat` (offset 50).
    ///
    /// # Errors
    ///
    /// [`DecodeError::Truncated`] if the table is too short;
    /// [`DecodeError::BadHeader`] if `unitsPerEm` is zero.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let r = Reader::new(data);
        let units_per_em = r.read_u16(18)?;
        if units_per_em == 0 {
            return Err(DecodeError::BadHeader);
        }
        let index_to_loc_format = if r.read_i16(50)? == 0 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        };
        Ok(Self {
            units_per_em,
            index_to_loc_format,
        })
    }
}

/// Fields extracted from the `maxp` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxpData {
    pub num_glyphs: u16,
}

impl MaxpData {
    /// Read `numGlyphs` (offset 4).
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let num_glyphs = Reader::new(data).read_u16(4)?;
        Ok(Self { num_glyphs })
    }
}

/// Fields extracted from the `hhea` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HheaData {
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    pub number_of_h_metrics: u16,
}

impl HheaData {
    /// Read ascent/descent/lineGap (offsets 4/6/8) and
    /// `numberOfHMetrics` (offset 34).
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let r = Reader::new(data);
        Ok(Self {
            ascent: r.read_i16(4)?,
            descent: r.read_i16(6)?,
            line_gap: r.read_i16(8)?,
            number_of_h_metrics: r.read_u16(34)?,
        })
    }
}

// ---------------------------------------------------------------------------
// loca
// ---------------------------------------------------------------------------

/// Materialized per-glyph byte offsets into `glyf`.
///
/// Holds `numGlyphs + 1` offsets; glyph *i* occupies
/// `[offsets[i], offsets[i + 1])`. An empty range is a blank glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaTable {
    offsets: Vec<u32>,
}

impl LocaTable {
    /// Decode the offset array, honoring the short/long format.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Truncated`] if the table is too short for
    /// `numGlyphs + 1` entries; [`DecodeError::LocaInconsistent`] if the
    /// offsets decrease or run past the end of `glyf`.
    pub fn parse(
        data: &[u8],
        num_glyphs: u16,
        format: LocaFormat,
        glyf_len: u32,
    ) -> Result<Self, DecodeError> {
        let r = Reader::new(data);
        let count = usize::from(num_glyphs) + 1;
        let mut offsets = Vec::with_capacity(count);
        for i in 0..count {
            let offset = match format {
                LocaFormat::Short => u32::from(r.read_u16(i * 2)?) * 2,
                LocaFormat::Long => r.read_u32(i * 4)?,
            };
            if let Some(&prev) = offsets.last() {
                if offset < prev {
                    return Err(DecodeError::LocaInconsistent);
                }
            }
            if offset > glyf_len {
                return Err(DecodeError::LocaInconsistent);
            }
            offsets.push(offset);
        }
        Ok(Self { offsets })
    }

    /// Number of glyphs covered by this table.
    #[must_use]
    pub fn num_glyphs(&self) -> u16 {
        // Construction guarantees `offsets.len() == numGlyphs + 1`.
        (self.offsets.len() - 1) as u16
    }

    /// Byte range of glyph `gid` inside `glyf`, or `None` if `gid` is out
    /// of range. An empty range denotes a blank glyph.
    #[must_use]
    pub fn glyph_range(&self, gid: u16) -> Option<(u32, u32)> {
        let i = usize::from(gid);
        let start = *self.offsets.get(i)?;
        let end = *self.offsets.get(i + 1)?;
        Some((start, end))
    }
}

// ---------------------------------------------------------------------------
// hmtx
// ---------------------------------------------------------------------------

/// One glyph's horizontal metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HMetric {
    pub advance_width: u16,
    pub lsb: i16,
}

/// Materialized horizontal metrics.
///
/// The table stores `numberOfHMetrics` (advance, lsb) pairs followed by
/// bare lsb values; the last stored advance repeats for every trailing
/// glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmtxTable {
    advances: Vec<u16>,
    lsbs: Vec<i16>,
}

impl HmtxTable {
    /// Decode advance and left-side-bearing arrays.
    pub fn parse(
        data: &[u8],
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, DecodeError> {
        let r = Reader::new(data);
        let full = usize::from(number_of_h_metrics);
        let total = usize::from(num_glyphs);

        let mut advances = Vec::with_capacity(full);
        let mut lsbs = Vec::with_capacity(total);
        for i in 0..full {
            advances.push(r.read_u16(i * 4)?);
            lsbs.push(r.read_i16(i * 4 + 2)?);
        }
        let tail = full * 4;
        for i in 0..total.saturating_sub(full) {
            lsbs.push(r.read_i16(tail + i * 2)?);
        }
        Ok(Self { advances, lsbs })
    }

    /// Metrics for glyph `gid`.
    ///
    /// The advance saturates to the last stored value for
    /// `gid >= numberOfHMetrics`. The caller is responsible for bounding
    /// `gid` by `numGlyphs`.
    #[must_use]
    pub fn hmetric(&self, gid: u16) -> HMetric {
        let i = usize::from(gid);
        let advance_width = self
            .advances
            .get(i)
            .or_else(|| self.advances.last())
            .copied()
            .unwrap_or(0);
        let lsb = self.lsbs.get(i).copied().unwrap_or(0);
        HMetric { advance_width, lsb }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be16(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn head_reads_fixed_offsets() {
        let mut data = vec![0u8; 54];
        data[18..20].copy_from_slice(&1000u16.to_be_bytes());
        data[50..52].copy_from_slice(&0i16.to_be_bytes());
        let head = HeadData::parse(&data).unwrap();
        assert_eq!(head.units_per_em, 1000);
        assert_eq!(head.index_to_loc_format, LocaFormat::Short);

        data[50..52].copy_from_slice(&1i16.to_be_bytes());
        let head = HeadData::parse(&data).unwrap();
        assert_eq!(head.index_to_loc_format, LocaFormat::Long);
    }

    #[test]
    fn head_rejects_zero_upem() {
        let data = vec![0u8; 54];
        assert_eq!(HeadData::parse(&data), Err(DecodeError::BadHeader));
    }

    #[test]
    fn loca_short_doubles_stored_values() {
        // 3 glyphs → 4 entries; stored halves: 0, 10, 10, 30
        let data = be16(&[0, 10, 10, 30]);
        let loca = LocaTable::parse(&data, 3, LocaFormat::Short, 60).unwrap();
        assert_eq!(loca.glyph_range(0), Some((0, 20)));
        assert_eq!(loca.glyph_range(1), Some((20, 20))); // blank
        assert_eq!(loca.glyph_range(2), Some((20, 60)));
        assert_eq!(loca.glyph_range(3), None);
    }

    #[test]
    fn loca_long_is_raw() {
        let data: Vec<u8> = [0u32, 8, 24]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let loca = LocaTable::parse(&data, 2, LocaFormat::Long, 24).unwrap();
        assert_eq!(loca.glyph_range(1), Some((8, 24)));
    }

    #[test]
    fn loca_rejects_decreasing_offsets() {
        let data = be16(&[0, 10, 5, 30]);
        assert_eq!(
            LocaTable::parse(&data, 3, LocaFormat::Short, 60),
            Err(DecodeError::LocaInconsistent)
        );
    }

    #[test]
    fn loca_rejects_offsets_past_glyf() {
        let data = be16(&[0, 10, 10, 30]);
        assert_eq!(
            LocaTable::parse(&data, 3, LocaFormat::Short, 40),
            Err(DecodeError::LocaInconsistent)
        );
    }

    #[test]
    fn loca_rejects_short_table() {
        let data = be16(&[0, 10]);
        assert_eq!(
            LocaTable::parse(&data, 3, LocaFormat::Short, 60),
            Err(DecodeError::Truncated)
        );
    }

    #[test]
    fn hmtx_trailing_advance_repeats() {
        // 2 full metrics + 2 bare lsbs for 4 glyphs.
        let mut data = Vec::new();
        data.extend_from_slice(&500u16.to_be_bytes());
        data.extend_from_slice(&10i16.to_be_bytes());
        data.extend_from_slice(&600u16.to_be_bytes());
        data.extend_from_slice(&20i16.to_be_bytes());
        data.extend_from_slice(&(-5i16).to_be_bytes());
        data.extend_from_slice(&30i16.to_be_bytes());

        let hmtx = HmtxTable::parse(&data, 2, 4).unwrap();
        assert_eq!(
            hmtx.hmetric(0),
            HMetric {
                advance_width: 500,
                lsb: 10
            }
        );
        assert_eq!(hmtx.hmetric(1).advance_width, 600);
        // Trailing glyphs reuse the last stored advance.
        assert_eq!(hmtx.hmetric(2).advance_width, 600);
        assert_eq!(hmtx.hmetric(2).lsb, -5);
        assert_eq!(hmtx.hmetric(3).advance_width, 600);
        assert_eq!(hmtx.hmetric(3).lsb, 30);
    }
}
