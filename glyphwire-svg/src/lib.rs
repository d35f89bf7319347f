//! SVG wireframe preview for `glyphwire`.
//!
//! A development surface: lays out a line of text with the pen, flattens
//! every glyph, and draws the closed polylines as `<path>` elements.
//! Glyph vertices are in Y-up font units; the placement transform
//! (scale + Y-flip + baseline translate) is applied per glyph via a
//! `kurbo::Affine`, so the document needs no global flip. Path data is
//! built as raw `d` strings to keep control of precision.

use glyphwire_font::{DecodeError, FontFile, Point};
use glyphwire_tess::{Pen, PenOptions, PlacedGlyph, DEFAULT_TOLERANCE};
use kurbo::Affine;
use svg::node::element::{Group, Path as SvgPath};
use svg::Document;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options controlling the preview output.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Rendered em size in pixels. Default: 64.
    pub font_size_px: f32,
    /// Flattening tolerance in font units. Default: 0.75.
    pub tolerance: f32,
    /// Wireframe stroke width in pixels. Default: 1.
    pub stroke_width: f32,
    /// Also draw each glyph's stencil-cover quad as a dashed box.
    pub show_cover_box: bool,
    /// Decimal places for coordinates. Default: 2.
    pub precision: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            font_size_px: 64.0,
            tolerance: DEFAULT_TOLERANCE,
            stroke_width: 1.0,
            show_cover_box: false,
            precision: 2,
        }
    }
}

/// Page margin around the rendered line, in pixels.
const MARGIN: f32 = 8.0;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render one line of text as a wireframe preview with default options.
///
/// # Errors
///
/// Glyph decode errors are surfaced verbatim.
pub fn render_line(font: &FontFile, text: &str) -> Result<Document, DecodeError> {
    render_line_with_options(font, text, &PreviewOptions::default())
}

/// Render one line of text as a wireframe preview.
///
/// # Errors
///
/// Glyph decode errors are surfaced verbatim.
pub fn render_line_with_options(
    font: &FontFile,
    text: &str,
    opts: &PreviewOptions,
) -> Result<Document, DecodeError> {
    let scale = opts.font_size_px / f32::from(font.units_per_em());
    let metrics = font.line_metrics();
    let ascent_px = f32::from(metrics.ascent) * scale;
    let descent_px = f32::from(metrics.descent) * scale; // negative

    let baseline = Point::new(MARGIN, MARGIN + ascent_px);
    let mut pen = Pen::new(
        font,
        baseline,
        PenOptions {
            font_size_px: opts.font_size_px,
            tolerance: opts.tolerance,
            ..PenOptions::default()
        },
    );
    let placed = pen.layout(text)?;

    let mut group = Group::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", fmt(opts.stroke_width, opts.precision));
    for glyph in &placed {
        if glyph.mesh.vertices.is_empty() {
            continue;
        }
        group = group.add(render_glyph(glyph, scale, opts));
        if opts.show_cover_box {
            group = group.add(render_cover_box(glyph, scale, opts));
        }
    }

    let width = pen.origin().x + MARGIN;
    let height = MARGIN * 2.0 + ascent_px - descent_px;
    Ok(Document::new()
        .set(
            "viewBox",
            format!(
                "0 0 {} {}",
                fmt(width, opts.precision),
                fmt(height, opts.precision)
            ),
        )
        .add(group))
}

// ---------------------------------------------------------------------------
// Per-glyph rendering
// ---------------------------------------------------------------------------

/// Placement transform for a glyph: font units → page pixels with the
/// baseline Y-flip.
fn placement(origin: Point, scale: f32) -> Affine {
    Affine::translate((f64::from(origin.x), f64::from(origin.y)))
        * Affine::scale_non_uniform(f64::from(scale), f64::from(-scale))
}

fn render_glyph(glyph: &PlacedGlyph, scale: f32, opts: &PreviewOptions) -> SvgPath {
    let affine = placement(glyph.origin, scale);
    let mut d = String::new();
    for range in contour_ranges(&glyph.mesh.line_indices) {
        let contour = &glyph.mesh.vertices[range];
        push_polyline(&mut d, contour, affine, opts.precision);
    }
    SvgPath::new().set("d", d)
}

fn render_cover_box(glyph: &PlacedGlyph, scale: f32, opts: &PreviewOptions) -> SvgPath {
    let affine = placement(glyph.origin, scale);
    let q = &glyph.mesh.cover_vertices;
    // Corner order is (min,min) (max,min) (min,max) (max,max); trace the
    // perimeter.
    let perimeter = [q[0], q[1], q[3], q[2]];
    let mut d = String::new();
    push_polyline(&mut d, &perimeter, affine, opts.precision);
    SvgPath::new()
        .set("d", d)
        .set("stroke", "gray")
        .set("stroke-dasharray", "3 2")
}

/// Append one closed polyline (`M … L … Z`) to the path data.
fn push_polyline(d: &mut String, points: &[Point], affine: Affine, precision: usize) {
    for (i, &p) in points.iter().enumerate() {
        let mapped = affine * kurbo::Point::new(f64::from(p.x), f64::from(p.y));
        let command = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!(
            "{command}{},{}",
            fmt64(mapped.x, precision),
            fmt64(mapped.y, precision)
        ));
    }
    d.push('Z');
}

/// Recover per-contour vertex ranges from closed line-list indices: a
/// contour boundary is where an edge jumps backward (the closing edge).
fn contour_ranges(line_indices: &[u32]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    for pair in line_indices.chunks(2) {
        if pair[1] <= pair[0] {
            ranges.push(pair[1] as usize..pair[0] as usize + 1);
        }
    }
    ranges
}

fn fmt(v: f32, precision: usize) -> String {
    format!("{v:.precision$}")
}

fn fmt64(v: f64, precision: usize) -> String {
    format!("{v:.precision$}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
