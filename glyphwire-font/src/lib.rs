//! TrueType outline engine for `glyphwire`.
//!
//! Parses the sfnt container and the minimum table set needed to map
//! code points to glyphs, decode glyph outlines (simple and compound),
//! and expose horizontal layout metrics. Hinting instructions are
//! skipped; the decoded [`Outline`] is raw design-space geometry ready
//! for the tessellator.
//!
//! This crate is intentionally independent of the tessellation crate:
//! all types are plain scalars, [`Point`], and parallel arrays. Bridging
//! to meshes happens in `glyphwire-tess`.

pub mod cmap;
pub mod directory;
pub mod error;
pub mod font;
mod glyf;
pub mod outline;
pub mod reader;
pub mod tables;

pub use directory::{TableInfo, Tag};
pub use error::DecodeError;
pub use font::{FontFile, LineMetrics};
pub use outline::{Outline, Point};
pub use tables::{HMetric, LocaFormat};
