//! Canonical per-glyph outline geometry.
//!
//! An [`Outline`] is three parallel arrays in one owned value: point
//! coordinates, on-curve classification, and contour end indices. This
//! keeps the decoder allocation-light and lets the tessellator borrow a
//! read-only view without per-point indirection.

use std::ops;

use bytemuck::{Pod, Zeroable};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D point in font units.
///
/// `#[repr(C)]` and `Pod` so that `&[Point]` casts directly to the byte
/// blob a GPU vertex buffer expects (interleaved f32 pairs).
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Debug, Pod, Zeroable)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Midpoint of `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Linearly interpolate between `self` and `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            t.mul_add(other.x - self.x, self.x),
            t.mul_add(other.y - self.y, self.y),
        )
    }
}

impl ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

/// Decoded glyph geometry in font units.
///
/// Invariants (upheld by the decoder):
/// - `on_curve.len() == points.len()`
/// - `contour_ends` is non-decreasing and its last value, when present,
///   equals `points.len() - 1`
/// - every contour holds at least one point
///
/// Contours are closed: the segment from each contour's last point back
/// to its first exists implicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    /// Point coordinates, all contours concatenated.
    pub points: Vec<Point>,
    /// Parallel flags: `true` = on the curve, `false` = quadratic control.
    pub on_curve: Vec<bool>,
    /// Index of the **last** point of each contour.
    pub contour_ends: Vec<u32>,
}

impl Outline {
    /// An outline with no geometry (blank glyph).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            on_curve: Vec::new(),
            contour_ends: Vec::new(),
        }
    }

    /// Whether the outline has no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points across all contours.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of contours.
    #[must_use]
    pub fn num_contours(&self) -> usize {
        self.contour_ends.len()
    }

    /// Point index range of contour `i`, or `None` if out of range.
    #[must_use]
    pub fn contour_range(&self, i: usize) -> Option<ops::Range<usize>> {
        let end = *self.contour_ends.get(i)? as usize;
        let start = if i == 0 {
            0
        } else {
            self.contour_ends[i - 1] as usize + 1
        };
        Some(start..end + 1)
    }

    /// Iterate over the point index range of each contour.
    pub fn contours(&self) -> impl Iterator<Item = ops::Range<usize>> + '_ {
        (0..self.num_contours()).filter_map(|i| self.contour_range(i))
    }

    /// Debug-time check of the parallel-array invariants.
    pub(crate) fn debug_check(&self) {
        debug_assert_eq!(self.points.len(), self.on_curve.len());
        debug_assert!(self
            .contour_ends
            .windows(2)
            .all(|w| w[0] <= w[1]));
        if let Some(&last) = self.contour_ends.last() {
            debug_assert_eq!(last as usize, self.points.len() - 1);
        } else {
            debug_assert!(self.points.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_contours() -> Outline {
        Outline {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(2.0, 2.0),
                Point::new(8.0, 2.0),
                Point::new(5.0, 7.0),
            ],
            on_curve: vec![true; 6],
            contour_ends: vec![2, 5],
        }
    }

    #[test]
    fn contour_ranges() {
        let o = two_contours();
        assert_eq!(o.contour_range(0), Some(0..3));
        assert_eq!(o.contour_range(1), Some(3..6));
        assert_eq!(o.contour_range(2), None);
        let ranges: Vec<_> = o.contours().collect();
        assert_eq!(ranges, vec![0..3, 3..6]);
    }

    #[test]
    fn empty_outline() {
        let o = Outline::empty();
        assert!(o.is_empty());
        assert_eq!(o.num_contours(), 0);
        assert_eq!(o.contours().count(), 0);
        o.debug_check();
    }

    #[test]
    fn point_ops() {
        let m = Point::new(0.0, 4.0).midpoint(Point::new(2.0, 0.0));
        assert_eq!(m, Point::new(1.0, 2.0));
        let l = Point::ZERO.lerp(Point::new(10.0, -10.0), 0.25);
        assert_eq!(l, Point::new(2.5, -2.5));
    }

    #[test]
    fn point_casts_to_bytes() {
        let pts = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&pts);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
    }
}
