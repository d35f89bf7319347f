//! `wasm-bindgen` bindings for the `glyphwire` core.
//!
//! The JavaScript host owns the GPU: it receives flat vertex/index
//! arrays and the packed 32-byte draw-parameter record, uploads them,
//! and runs the stencil-then-cover passes. Nothing here touches a
//! device.

use glyphwire_font::FontFile;
use glyphwire_tess::{build_mesh, DrawParams};
use wasm_bindgen::prelude::*;

/// A loaded font, queryable from JavaScript.
#[wasm_bindgen]
pub struct Font {
    inner: FontFile,
}

#[wasm_bindgen]
impl Font {
    /// Parse a font from raw bytes (e.g. a `fetch`ed ArrayBuffer).
    pub fn load(bytes: &[u8]) -> Result<Font, JsValue> {
        FontFile::load(bytes)
            .map(|inner| Self { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = unitsPerEm)]
    pub fn units_per_em(&self) -> u16 {
        self.inner.units_per_em()
    }

    #[wasm_bindgen(getter, js_name = numGlyphs)]
    pub fn num_glyphs(&self) -> u16 {
        self.inner.num_glyphs()
    }

    #[wasm_bindgen(getter)]
    pub fn ascent(&self) -> i16 {
        self.inner.line_metrics().ascent
    }

    #[wasm_bindgen(getter)]
    pub fn descent(&self) -> i16 {
        self.inner.line_metrics().descent
    }

    #[wasm_bindgen(getter, js_name = lineGap)]
    pub fn line_gap(&self) -> i16 {
        self.inner.line_metrics().line_gap
    }

    /// Map a code point to a glyph id; 0 means "no glyph".
    #[wasm_bindgen(js_name = mapCodePoint)]
    pub fn map_code_point(&self, code_point: u32) -> u16 {
        self.inner.map_code_point(code_point)
    }

    /// Advance width for a glyph, in font units.
    #[wasm_bindgen(js_name = advanceWidth)]
    pub fn advance_width(&self, gid: u16) -> Result<u16, JsValue> {
        self.inner
            .hmetric(gid)
            .map(|m| m.advance_width)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode and tessellate one glyph by code point.
    #[wasm_bindgen(js_name = glyphMesh)]
    pub fn glyph_mesh(&self, code_point: u32, tolerance: f32) -> Result<MeshData, JsValue> {
        let gid = self.inner.map_code_point(code_point);
        let to_js = |e: glyphwire_font::DecodeError| JsValue::from_str(&e.to_string());
        let outline = self.inner.outline(gid).map_err(to_js)?;
        let advance = self.inner.hmetric(gid).map_err(to_js)?.advance_width;
        let mesh = build_mesh(&outline, advance, tolerance, 0.0);

        Ok(MeshData {
            vertices: mesh
                .vertices
                .iter()
                .flat_map(|p| [p.x, p.y])
                .collect(),
            line_indices: mesh.line_indices,
            fan_indices: mesh.fan_indices,
            cover_vertices: mesh
                .cover_vertices
                .iter()
                .flat_map(|p| [p.x, p.y])
                .collect(),
            cover_indices: mesh.cover_indices.to_vec(),
            advance_width: mesh.advance_width,
        })
    }
}

/// One glyph's tessellated geometry, exposed as flat arrays.
#[wasm_bindgen]
pub struct MeshData {
    vertices: Vec<f32>,
    line_indices: Vec<u32>,
    fan_indices: Vec<u32>,
    cover_vertices: Vec<f32>,
    cover_indices: Vec<u32>,
    advance_width: u16,
}

#[wasm_bindgen]
impl MeshData {
    /// Interleaved x,y vertex positions in font units.
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f32> {
        self.vertices.clone()
    }

    #[wasm_bindgen(getter, js_name = lineIndices)]
    pub fn line_indices(&self) -> Vec<u32> {
        self.line_indices.clone()
    }

    #[wasm_bindgen(getter, js_name = fanIndices)]
    pub fn fan_indices(&self) -> Vec<u32> {
        self.fan_indices.clone()
    }

    #[wasm_bindgen(getter, js_name = coverVertices)]
    pub fn cover_vertices(&self) -> Vec<f32> {
        self.cover_vertices.clone()
    }

    #[wasm_bindgen(getter, js_name = coverIndices)]
    pub fn cover_indices(&self) -> Vec<u32> {
        self.cover_indices.clone()
    }

    #[wasm_bindgen(getter, js_name = advanceWidth)]
    pub fn advance_width(&self) -> u16 {
        self.advance_width
    }
}

/// Pack the per-draw parameter record (32 bytes, little-endian) for
/// upload as a uniform buffer.
#[wasm_bindgen(js_name = drawParams)]
#[must_use]
pub fn draw_params(
    units_per_em: f32,
    font_size_px: f32,
    origin_x: f32,
    origin_y: f32,
    canvas_w: f32,
    canvas_h: f32,
    time: f32,
) -> Vec<u8> {
    DrawParams {
        units_per_em,
        font_size_px,
        origin_x,
        origin_y,
        canvas_w,
        canvas_h,
        time,
        pad: 0.0,
    }
    .as_bytes()
    .to_vec()
}
