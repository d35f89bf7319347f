//! Vector-glyph tessellation for `glyphwire`.
//!
//! Turns canonical outlines from `glyphwire-font` into GPU-ready
//! geometry: adaptively flattened wireframe polylines, triangle fans
//! plus a cover quad for the two-pass stencil fill, packed draw
//! parameters, and a simple left-to-right layout pen.

pub mod bbox;
pub mod flatten;
pub mod gpu;
pub mod layout;
pub mod mesh;

pub use bbox::BoundingBox;
pub use flatten::{flatten, FlattenedOutline, QuadSegment, DEFAULT_TOLERANCE};
pub use gpu::{index_bytes, vertex_bytes, DrawParams};
pub use layout::{Pen, PenOptions, PlacedGlyph};
pub use mesh::{
    build_mesh, tessellate_stencil_cover, tessellate_wireframe, GlyphMesh, StencilCover, Wireframe,
};
