//! Loaded font state and the public query surface.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cmap::CmapResolver;
use crate::directory::{TableDirectory, TableInfo, Tag};
use crate::error::DecodeError;
use crate::glyf::{self, OutlineCache};
use crate::outline::Outline;
use crate::reader::Reader;
use crate::tables::{HMetric, HeadData, HheaData, HmtxTable, LocaTable, MaxpData};

/// Vertical line metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    /// Distance from baseline to the top of the em (positive).
    pub ascent: i16,
    /// Distance from baseline to the bottom of the em (negative).
    pub descent: i16,
    /// Extra space between lines.
    pub line_gap: i16,
}

/// A loaded TrueType font.
///
/// Owns the raw bytes (`Arc`-shared, so clones are cheap views over the
/// same buffer) plus the eagerly parsed metric tables and the lazily
/// filled outline cache. A `FontFile` is immutable after `load` apart
/// from the insert-only cache; for multi-threaded use, give each thread
/// its own instance or synchronize externally.
#[derive(Debug, Clone)]
pub struct FontFile {
    data: Arc<[u8]>,
    glyf: TableInfo,
    head: HeadData,
    hhea: HheaData,
    loca: LocaTable,
    hmtx: HmtxTable,
    cmap: CmapResolver,
    cache: OutlineCache,
}

impl FontFile {
    /// Parse a font from its raw bytes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BadHeader`] for a malformed sfnt header or
    /// impossible metric fields, [`DecodeError::MissingTable`] when a
    /// required table is absent, [`DecodeError::Truncated`] when a table
    /// is shorter than its declared content, and
    /// [`DecodeError::UnsupportedCmap`] / [`DecodeError::LocaInconsistent`]
    /// for defects in those tables.
    pub fn load(bytes: impl Into<Arc<[u8]>>) -> Result<Self, DecodeError> {
        let data: Arc<[u8]> = bytes.into();
        let reader = Reader::new(&data);
        let dir = TableDirectory::parse(&reader)?;

        let head = HeadData::parse(table(&reader, &dir, Tag::HEAD)?)?;
        let maxp = MaxpData::parse(table(&reader, &dir, Tag::MAXP)?)?;
        let hhea = HheaData::parse(table(&reader, &dir, Tag::HHEA)?)?;
        if hhea.number_of_h_metrics == 0 || hhea.number_of_h_metrics > maxp.num_glyphs {
            return Err(DecodeError::BadHeader);
        }

        let glyf = dir.require(Tag::GLYF)?;
        let loca = LocaTable::parse(
            table(&reader, &dir, Tag::LOCA)?,
            maxp.num_glyphs,
            head.index_to_loc_format,
            glyf.length,
        )?;
        let hmtx = HmtxTable::parse(
            table(&reader, &dir, Tag::HMTX)?,
            hhea.number_of_h_metrics,
            maxp.num_glyphs,
        )?;
        let cmap = CmapResolver::parse(table(&reader, &dir, Tag::CMAP)?)?;

        log::debug!(
            "loaded font: {} glyphs, {} units/em",
            maxp.num_glyphs,
            head.units_per_em
        );

        Ok(Self {
            data,
            glyf,
            head,
            hhea,
            loca,
            hmtx,
            cmap,
            cache: OutlineCache::default(),
        })
    }

    /// Design units per em.
    #[must_use]
    pub const fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    /// Number of glyphs in the font.
    #[must_use]
    pub fn num_glyphs(&self) -> u16 {
        self.loca.num_glyphs()
    }

    /// Ascent, descent, and line gap from `hhea`.
    #[must_use]
    pub const fn line_metrics(&self) -> LineMetrics {
        LineMetrics {
            ascent: self.hhea.ascent,
            descent: self.hhea.descent,
            line_gap: self.hhea.line_gap,
        }
    }

    /// Map a Unicode code point to a glyph id; 0 means "no glyph".
    #[must_use]
    pub fn map_code_point(&self, cp: u32) -> u16 {
        self.cmap.map(cp)
    }

    /// Map through the format-4 subtable only, when the font has one.
    /// Exposed for cross-checking subtable agreement.
    #[must_use]
    pub fn map_code_point_format4(&self, cp: u32) -> Option<u16> {
        self.cmap.map_format4(cp)
    }

    /// Horizontal metrics for a glyph. The advance saturates to the last
    /// stored value for glyphs beyond `numberOfHMetrics`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::GidOutOfRange`] for `gid >= numGlyphs`.
    pub fn hmetric(&self, gid: u16) -> Result<HMetric, DecodeError> {
        if gid >= self.num_glyphs() {
            return Err(DecodeError::GidOutOfRange(gid));
        }
        Ok(self.hmtx.hmetric(gid))
    }

    /// Decode (or fetch the memoized) outline for a glyph. Blank glyphs
    /// yield an empty outline.
    ///
    /// # Errors
    ///
    /// [`DecodeError::GidOutOfRange`] for `gid >= numGlyphs`; decode
    /// errors from the `glyf` data are surfaced verbatim.
    pub fn outline(&self, gid: u16) -> Result<Arc<Outline>, DecodeError> {
        let glyf = Reader::new(&self.data)
            .slice(self.glyf.offset as usize, self.glyf.length as usize)?;
        let mut stack = Vec::new();
        glyf::decode_outline(glyf, &self.loca, &self.cache, gid, &mut stack)
    }

    /// A view over the same byte buffer with a cold outline cache.
    ///
    /// Useful for handing an independent instance to another thread.
    #[must_use]
    pub fn fresh_view(&self) -> Self {
        Self {
            cache: OutlineCache::new(HashMap::new()),
            ..self.clone()
        }
    }
}

/// Borrow a required table's bytes.
fn table<'a>(
    reader: &Reader<'a>,
    dir: &TableDirectory,
    tag: Tag,
) -> Result<&'a [u8], DecodeError> {
    let info = dir.require(tag)?;
    reader.slice(info.offset as usize, info.length as usize)
}
