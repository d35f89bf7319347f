//! Left-to-right pen layout.
//!
//! Walks a string, resolves each code point to a glyph, builds its mesh,
//! and yields baseline origins in pixel space. Vertex data stays in font
//! units; the consumer applies `font_size_px / units_per_em` and the
//! Y-flip (`y_px = origin_y - y_fu * scale`) at the GPU or raster
//! boundary.

use glyphwire_font::{DecodeError, FontFile, Point};

use crate::flatten::DEFAULT_TOLERANCE;
use crate::mesh::{build_mesh, GlyphMesh};

/// Knobs for the pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenOptions {
    /// Rendered em size in pixels.
    pub font_size_px: f32,
    /// Extra pixels between glyphs.
    pub letter_spacing: f32,
    /// Flattening tolerance in font units.
    pub tolerance: f32,
    /// Cover-quad padding in font units.
    pub cover_pad: f32,
}

impl Default for PenOptions {
    fn default() -> Self {
        Self {
            font_size_px: 16.0,
            letter_spacing: 0.0,
            tolerance: DEFAULT_TOLERANCE,
            cover_pad: 0.0,
        }
    }
}

/// One laid-out glyph: id, baseline origin in pixels, and its mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub gid: u16,
    pub origin: Point,
    pub mesh: GlyphMesh,
}

/// A pen that advances left-to-right from a starting origin.
#[derive(Debug)]
pub struct Pen<'a> {
    font: &'a FontFile,
    options: PenOptions,
    origin: Point,
    line_start_x: f32,
}

impl<'a> Pen<'a> {
    /// Create a pen at `origin` (baseline, pixel space).
    #[must_use]
    pub const fn new(font: &'a FontFile, origin: Point, options: PenOptions) -> Self {
        Self {
            font,
            options,
            origin,
            line_start_x: origin.x,
        }
    }

    /// Pixels per font unit at the configured size.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.options.font_size_px / f32::from(self.font.units_per_em())
    }

    /// Current pen position.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Lay out a string, yielding one placed glyph per non-newline code
    /// point. `'\n'` moves the baseline down by the scaled line gap and
    /// returns the pen to the line start.
    ///
    /// # Errors
    ///
    /// Decode errors from the glyph data are surfaced verbatim.
    pub fn layout(&mut self, text: &str) -> Result<Vec<PlacedGlyph>, DecodeError> {
        let scale = self.scale();
        let line_gap = f32::from(self.font.line_metrics().line_gap);
        let mut placed = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                self.origin.y += line_gap * scale;
                self.origin.x = self.line_start_x;
                continue;
            }
            let gid = self.font.map_code_point(u32::from(ch));
            let outline = self.font.outline(gid)?;
            let advance = self.font.hmetric(gid)?.advance_width;
            let mesh = build_mesh(
                &outline,
                advance,
                self.options.tolerance,
                self.options.cover_pad,
            );
            placed.push(PlacedGlyph {
                gid,
                origin: self.origin,
                mesh,
            });
            self.origin.x += f32::from(advance) * scale + self.options.letter_spacing;
        }
        Ok(placed)
    }
}
