//! The GPU boundary: opaque byte blobs and the per-draw parameter
//! record.
//!
//! The tessellator never talks to a device. Consumers upload the blobs
//! returned here and schedule their own draws; vertex coordinates stay
//! in raw font units, and the shader applies
//! `scale = font_size_px / units_per_em` plus the baseline Y-flip.

use bytemuck::{Pod, Zeroable};
use glyphwire_font::Point;

/// Per-draw parameters, 32 bytes, tightly packed for direct upload as a
/// uniform. Field order is part of the contract with the shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawParams {
    pub units_per_em: f32,
    pub font_size_px: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub canvas_w: f32,
    pub canvas_h: f32,
    pub time: f32,
    /// Keeps the record at 32 bytes; reserved.
    pub pad: f32,
}

const _: () = assert!(std::mem::size_of::<DrawParams>() == 32);

impl DrawParams {
    /// The packed in-memory record, ready for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Vertex positions as an interleaved f32-pair byte blob.
#[must_use]
pub fn vertex_bytes(points: &[Point]) -> &[u8] {
    bytemuck::cast_slice(points)
}

/// Index array as a byte blob (u32 indices).
#[must_use]
pub fn index_bytes(indices: &[u32]) -> &[u8] {
    bytemuck::cast_slice(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_record_is_32_bytes_in_field_order() {
        let params = DrawParams {
            units_per_em: 1000.0,
            font_size_px: 24.0,
            origin_x: 10.0,
            origin_y: 20.0,
            canvas_w: 800.0,
            canvas_h: 600.0,
            time: 1.5,
            pad: 0.0,
        };
        let bytes = params.as_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &1000.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &24.0f32.to_le_bytes());
        assert_eq!(&bytes[24..28], &1.5f32.to_le_bytes());
    }

    #[test]
    fn vertex_blob_interleaves_pairs() {
        let points = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let bytes = vertex_bytes(&points);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &3.0f32.to_le_bytes());
    }

    #[test]
    fn index_blob_matches_u32_layout() {
        let indices = [0u32, 1, 2];
        assert_eq!(index_bytes(&indices).len(), 12);
    }
}
