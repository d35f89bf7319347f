//! Index construction for wireframe and stencil-cover rendering.
//!
//! The flattened polylines become GPU geometry two ways: a line list
//! that draws each contour as a closed loop, and a triangle fan per
//! contour whose signed coverage implements the non-zero winding rule
//! under a stencil-wrap pass, plus a bounding-box quad for the cover
//! pass.

use glyphwire_font::{Outline, Point};

use crate::bbox::BoundingBox;
use crate::flatten::{flatten, FlattenedOutline};

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Closed-polyline geometry for wireframe rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wireframe {
    /// Flattened vertex positions in font units.
    pub vertices: Vec<Point>,
    /// Pairs of vertex indices; every contour is closed.
    pub line_indices: Vec<u32>,
}

/// Geometry for the two-pass stencil-then-cover fill.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilCover {
    /// Flattened vertex positions in font units.
    pub stencil_vertices: Vec<Point>,
    /// Triangle-fan indices (three per triangle) for the stencil pass.
    pub fan_indices: Vec<u32>,
    /// Corners of the (optionally padded) bounding quad.
    pub cover_vertices: [Point; 4],
    /// Two triangles over the quad.
    pub cover_indices: [u32; 6],
}

/// Everything a consumer needs to draw one glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMesh {
    /// Flattened vertex positions in font units, shared by both index
    /// sets.
    pub vertices: Vec<Point>,
    pub line_indices: Vec<u32>,
    pub fan_indices: Vec<u32>,
    pub cover_vertices: [Point; 4],
    pub cover_indices: [u32; 6],
    /// Horizontal advance in font units.
    pub advance_width: u16,
}

/// Triangle order for the cover quad: (min,min) (max,min) (min,max) /
/// (min,max) (max,min) (max,max).
const COVER_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

// ---------------------------------------------------------------------------
// Public builders
// ---------------------------------------------------------------------------

/// Flatten and build closed line-list indices. Never fails; an empty
/// outline yields empty buffers.
#[must_use]
pub fn tessellate_wireframe(outline: &Outline, tolerance: f32) -> Wireframe {
    let flat = flatten(outline, tolerance);
    let line_indices = line_list_indices(&flat);
    Wireframe {
        vertices: flat.points,
        line_indices,
    }
}

/// Flatten and build stencil-pass fans plus the cover quad, padded by
/// `pad` font units on every side (0 when the vertex stage applies no
/// distortion).
#[must_use]
pub fn tessellate_stencil_cover(outline: &Outline, tolerance: f32, pad: f32) -> StencilCover {
    let flat = flatten(outline, tolerance);
    let fan_indices = fan_indices(&flat);
    let cover_vertices = cover_quad(&flat.points, pad);
    StencilCover {
        stencil_vertices: flat.points,
        fan_indices,
        cover_vertices,
        cover_indices: COVER_INDICES,
    }
}

/// Build the combined per-glyph mesh from one flattening pass.
#[must_use]
pub fn build_mesh(outline: &Outline, advance_width: u16, tolerance: f32, pad: f32) -> GlyphMesh {
    let flat = flatten(outline, tolerance);
    let line_indices = line_list_indices(&flat);
    let fan_indices = fan_indices(&flat);
    let cover_vertices = cover_quad(&flat.points, pad);
    GlyphMesh {
        vertices: flat.points,
        line_indices,
        fan_indices,
        cover_vertices,
        cover_indices: COVER_INDICES,
        advance_width,
    }
}

// ---------------------------------------------------------------------------
// Index builders
// ---------------------------------------------------------------------------

/// `(i, i+1)` pairs along each contour plus the closing `(end, start)`.
fn line_list_indices(flat: &FlattenedOutline) -> Vec<u32> {
    let mut indices = Vec::new();
    for range in flat.contours() {
        let start = range.start as u32;
        let end = range.end as u32 - 1;
        for i in start..end {
            indices.push(i);
            indices.push(i + 1);
        }
        indices.push(end);
        indices.push(start);
    }
    indices
}

/// `(start, i, i+1)` fans per contour. Winding of each triangle follows
/// the contour's own orientation, which is what gives counters their
/// negative coverage in the stencil pass.
fn fan_indices(flat: &FlattenedOutline) -> Vec<u32> {
    let mut indices = Vec::new();
    for range in flat.contours() {
        let start = range.start as u32;
        let end = range.end as u32 - 1;
        for i in (start + 1)..end {
            indices.push(start);
            indices.push(i);
            indices.push(i + 1);
        }
    }
    indices
}

/// Bounding quad corners, or all-zero for empty geometry.
fn cover_quad(points: &[Point], pad: f32) -> [Point; 4] {
    let bb = BoundingBox::of_points(points);
    if !bb.is_valid() {
        return [Point::ZERO; 4];
    }
    let bb = bb.padded(pad);
    [
        Point::new(bb.min_x, bb.min_y),
        Point::new(bb.max_x, bb.min_y),
        Point::new(bb.min_x, bb.max_y),
        Point::new(bb.max_x, bb.max_y),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
