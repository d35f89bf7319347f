//! Glyph outline decoding from the `glyf` table.
//!
//! Simple glyphs store a bit-packed flag stream followed by
//! delta-encoded X and Y coordinate streams. Compound glyphs reference
//! other glyphs with an affine transform and either an (x, y) offset or
//! a pair of point indices to align. Components are resolved through the
//! shared outline cache; cycles and runaway nesting are detected.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::outline::{Outline, Point};
use crate::reader::Reader;
use crate::tables::LocaTable;

/// Soft cap on compound nesting (spec'd fonts stay far below this).
const MAX_COMPOUND_DEPTH: usize = 32;

// Simple-glyph flag bits.
const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;

// Compound-glyph flag bits. Remaining bits are ignored here.
const ARGS_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY: u16 = 0x0002;
const SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const XY_SCALE: u16 = 0x0040;
const TWO_BY_TWO: u16 = 0x0080;
const HAVE_INSTRUCTIONS: u16 = 0x0100;

/// Per-font memo of decoded outlines, shared by compound recursion.
pub(crate) type OutlineCache = RefCell<HashMap<u16, Arc<Outline>>>;

// ---------------------------------------------------------------------------
// Component transform
// ---------------------------------------------------------------------------

/// Affine transform of one compound component, in font units.
///
/// Maps (x, y) to `(a·x + b·y + dx, c·x + d·y + dy)`. Scale factors are
/// F2Dot14 in the file; the translation is resolved from the component's
/// arguments.
#[derive(Debug, Clone, Copy)]
struct ComponentTransform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    dx: f32,
    dy: f32,
}

impl ComponentTransform {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a.mul_add(p.x, self.b * p.y) + self.dx,
            self.c.mul_add(p.x, self.d * p.y) + self.dy,
        )
    }

    /// The 2×2 part only, for anchor-point alignment.
    fn linear(&self, p: Point) -> Point {
        Point::new(
            self.a.mul_add(p.x, self.b * p.y),
            self.c.mul_add(p.x, self.d * p.y),
        )
    }
}

// ---------------------------------------------------------------------------
// Decoder entry
// ---------------------------------------------------------------------------

/// Decode glyph `gid` into a canonical outline, memoizing the result.
///
/// `stack` is the compound visiting stack; top-level callers pass an
/// empty one.
pub(crate) fn decode_outline(
    glyf: &[u8],
    loca: &LocaTable,
    cache: &OutlineCache,
    gid: u16,
    stack: &mut Vec<u16>,
) -> Result<Arc<Outline>, DecodeError> {
    if gid >= loca.num_glyphs() {
        return Err(DecodeError::GidOutOfRange(gid));
    }
    if let Some(outline) = cache.borrow().get(&gid) {
        return Ok(Arc::clone(outline));
    }
    if stack.contains(&gid) {
        return Err(DecodeError::CompoundCycle(gid));
    }
    if stack.len() >= MAX_COMPOUND_DEPTH {
        return Err(DecodeError::CompoundDepthExceeded(gid));
    }

    let (start, end) = loca
        .glyph_range(gid)
        .ok_or(DecodeError::GidOutOfRange(gid))?;
    let outline = if start == end {
        Outline::empty()
    } else {
        let data = Reader::new(glyf).slice(start as usize, (end - start) as usize)?;
        let r = Reader::new(data);
        let num_contours = r.read_i16(0)?;
        if num_contours >= 0 {
            decode_simple(&r, num_contours as usize)?
        } else {
            stack.push(gid);
            let result = decode_compound(&r, glyf, loca, cache, stack);
            stack.pop();
            result?
        }
    };
    outline.debug_check();

    let outline = Arc::new(outline);
    cache.borrow_mut().insert(gid, Arc::clone(&outline));
    Ok(outline)
}

// ---------------------------------------------------------------------------
// Simple glyphs
// ---------------------------------------------------------------------------

#[expect(
    clippy::cast_precision_loss,
    reason = "glyph coordinates are cumulative sums of 16-bit deltas"
)]
fn decode_simple(r: &Reader<'_>, num_contours: usize) -> Result<Outline, DecodeError> {
    let mut pos = 10; // numberOfContours + bounding box

    let mut contour_ends = Vec::with_capacity(num_contours);
    for _ in 0..num_contours {
        contour_ends.push(u32::from(r.read_u16(pos)?));
        pos += 2;
    }
    if !contour_ends.windows(2).all(|w| w[0] < w[1]) {
        log::warn!("glyph has non-increasing contour end points; treating as blank");
        return Ok(Outline::empty());
    }
    let Some(&last) = contour_ends.last() else {
        return Ok(Outline::empty());
    };
    let num_points = last as usize + 1;

    let instruction_len = usize::from(r.read_u16(pos)?);
    pos += 2 + instruction_len;

    // Flag stream: REPEAT expands the previous flag, never past the
    // point count.
    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = r.read_u8(pos)?;
        pos += 1;
        flags.push(flag);
        if flag & REPEAT != 0 {
            let count = usize::from(r.read_u8(pos)?);
            pos += 1;
            let count = count.min(num_points - flags.len());
            flags.resize(flags.len() + count, flag);
        }
    }

    let (xs, after_x) = decode_coords(r, pos, &flags, X_SHORT, X_SAME_OR_POSITIVE)?;
    let (ys, _) = decode_coords(r, after_x, &flags, Y_SHORT, Y_SAME_OR_POSITIVE)?;

    let points = xs
        .iter()
        .zip(&ys)
        .map(|(&x, &y)| Point::new(x as f32, y as f32))
        .collect();
    let on_curve = flags.iter().map(|f| f & ON_CURVE != 0).collect();
    Ok(Outline {
        points,
        on_curve,
        contour_ends,
    })
}

/// Decode one delta stream (X or Y). Coordinates are the running sum of
/// the deltas, starting at 0.
fn decode_coords(
    r: &Reader<'_>,
    mut pos: usize,
    flags: &[u8],
    short_bit: u8,
    same_or_positive: u8,
) -> Result<(Vec<i32>, usize), DecodeError> {
    let mut coords = Vec::with_capacity(flags.len());
    let mut value = 0i32;
    for &flag in flags {
        let delta = if flag & short_bit != 0 {
            let magnitude = i32::from(r.read_u8(pos)?);
            pos += 1;
            if flag & same_or_positive != 0 {
                magnitude
            } else {
                -magnitude
            }
        } else if flag & same_or_positive != 0 {
            0
        } else {
            let d = i32::from(r.read_i16(pos)?);
            pos += 2;
            d
        };
        value += delta;
        coords.push(value);
    }
    Ok((coords, pos))
}

// ---------------------------------------------------------------------------
// Compound glyphs
// ---------------------------------------------------------------------------

#[expect(
    clippy::cast_precision_loss,
    reason = "component offsets are 16-bit values"
)]
fn decode_compound(
    r: &Reader<'_>,
    glyf: &[u8],
    loca: &LocaTable,
    cache: &OutlineCache,
    stack: &mut Vec<u16>,
) -> Result<Outline, DecodeError> {
    let mut outline = Outline::empty();
    let mut pos = 10;

    loop {
        let flags = r.read_u16(pos)?;
        let component_gid = r.read_u16(pos + 2)?;
        pos += 4;

        let (arg1, arg2) = if flags & ARGS_ARE_WORDS != 0 {
            let a = i32::from(r.read_i16(pos)?);
            let b = i32::from(r.read_i16(pos + 2)?);
            pos += 4;
            (a, b)
        } else {
            let a = i32::from(r.read_u8(pos)? as i8);
            let b = i32::from(r.read_u8(pos + 1)? as i8);
            pos += 2;
            (a, b)
        };

        let mut transform = ComponentTransform::IDENTITY;
        if flags & SCALE != 0 {
            let s = r.read_f2dot14(pos)?;
            pos += 2;
            transform.a = s;
            transform.d = s;
        } else if flags & XY_SCALE != 0 {
            transform.a = r.read_f2dot14(pos)?;
            transform.d = r.read_f2dot14(pos + 2)?;
            pos += 4;
        } else if flags & TWO_BY_TWO != 0 {
            transform.a = r.read_f2dot14(pos)?;
            transform.b = r.read_f2dot14(pos + 2)?;
            transform.c = r.read_f2dot14(pos + 4)?;
            transform.d = r.read_f2dot14(pos + 6)?;
            pos += 8;
        }

        let component = decode_outline(glyf, loca, cache, component_gid, stack)?;

        if flags & ARGS_ARE_XY != 0 {
            transform.dx = arg1 as f32;
            transform.dy = arg2 as f32;
        } else {
            // Point-index alignment: arg1 indexes the component's
            // untransformed points, arg2 the points assembled so far.
            // The translation makes the two coincide.
            let local = anchor_point(&component.points, arg1);
            let aligned = transform.linear(local);
            let parent = anchor_point(&outline.points, arg2);
            transform.dx = parent.x - aligned.x;
            transform.dy = parent.y - aligned.y;
        }

        let base = outline.points.len() as u32;
        outline
            .points
            .extend(component.points.iter().map(|&p| transform.apply(p)));
        outline.on_curve.extend_from_slice(&component.on_curve);
        outline
            .contour_ends
            .extend(component.contour_ends.iter().map(|&e| e + base));

        if flags & MORE_COMPONENTS == 0 {
            if flags & HAVE_INSTRUCTIONS != 0 {
                let n = usize::from(r.read_u16(pos)?);
                r.slice(pos + 2, n)?; // present but discarded
            }
            break;
        }
    }
    Ok(outline)
}

/// Look up an anchor point, saturating out-of-range indices to the
/// nearest valid one. An empty point set anchors at the origin.
fn anchor_point(points: &[Point], index: i32) -> Point {
    let Some(max) = points.len().checked_sub(1) else {
        return Point::ZERO;
    };
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "point counts fit in i32"
    )]
    let clamped = index.clamp(0, max as i32) as usize;
    if clamped as i32 != index {
        log::warn!("compound anchor index {index} out of range; clamped to {clamped}");
    }
    points[clamped]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
