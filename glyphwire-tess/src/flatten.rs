//! Adaptive flattening of quadratic Bézier outlines.
//!
//! Walks each contour of a canonical [`Outline`], resolving the implicit
//! on-curve midpoints of the TrueType encoding, and emits a closed
//! polyline per contour. Curves are subdivided by de Casteljau bisection
//! until the control point sits within the tolerance of its chord, with
//! a fixed depth cap as a safety valve for degenerate segments.

use glyphwire_font::{Outline, Point};

/// Default chord tolerance in font units, tuned for wireframe rendering.
pub const DEFAULT_TOLERANCE: f32 = 0.75;

/// Maximum bisection depth: at most 4096 chords per curve.
const MAX_DEPTH: u32 = 12;

// ---------------------------------------------------------------------------
// Quadratic segment
// ---------------------------------------------------------------------------

/// A quadratic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSegment {
    pub p0: Point,
    pub ctrl: Point,
    pub p1: Point,
}

impl QuadSegment {
    /// Create a new segment from endpoint, control, endpoint.
    #[must_use]
    pub const fn new(p0: Point, ctrl: Point, p1: Point) -> Self {
        Self { p0, ctrl, p1 }
    }

    /// Evaluate the point at parameter `t` in [0, 1].
    #[must_use]
    pub fn eval(&self, t: f32) -> Point {
        let s = 1.0 - t;
        let a = s * s;
        let b = 2.0 * s * t;
        let c = t * t;
        Point::new(
            c.mul_add(self.p1.x, a.mul_add(self.p0.x, b * self.ctrl.x)),
            c.mul_add(self.p1.y, a.mul_add(self.p0.y, b * self.ctrl.y)),
        )
    }

    /// Split at `t = 0.5` using de Casteljau's algorithm.
    ///
    /// Returns `(left_half, right_half)`.
    #[must_use]
    pub fn split(&self) -> (Self, Self) {
        let m0 = self.p0.midpoint(self.ctrl);
        let m1 = self.ctrl.midpoint(self.p1);
        let mid = m0.midpoint(m1);
        (Self::new(self.p0, m0, mid), Self::new(mid, m1, self.p1))
    }

    /// Perpendicular distance from the control point to the chord.
    ///
    /// For a degenerate chord (coincident endpoints) this falls back to
    /// the distance from the control point to the endpoint.
    #[must_use]
    pub fn flatness(&self) -> f32 {
        let chord = self.p1 - self.p0;
        let offset = self.ctrl - self.p0;
        let len = chord.x.hypot(chord.y);
        if len <= f32::EPSILON {
            return offset.x.hypot(offset.y);
        }
        (chord.x.mul_add(offset.y, -(chord.y * offset.x))).abs() / len
    }
}

// ---------------------------------------------------------------------------
// Flattened outline
// ---------------------------------------------------------------------------

/// The flattener's output: one closed polyline per contour, stored the
/// same way as [`Outline`] (concatenated points + last-index markers).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedOutline {
    pub points: Vec<Point>,
    /// Index of the **last** point of each contour.
    pub contour_ends: Vec<u32>,
}

impl FlattenedOutline {
    /// Whether any geometry was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of contours.
    #[must_use]
    pub fn num_contours(&self) -> usize {
        self.contour_ends.len()
    }

    /// Point index range of contour `i`, or `None` if out of range.
    #[must_use]
    pub fn contour_range(&self, i: usize) -> Option<std::ops::Range<usize>> {
        let end = *self.contour_ends.get(i)? as usize;
        let start = if i == 0 {
            0
        } else {
            self.contour_ends[i - 1] as usize + 1
        };
        Some(start..end + 1)
    }

    /// Iterate over the point index range of each contour.
    pub fn contours(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        (0..self.num_contours()).filter_map(|i| self.contour_range(i))
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten every contour of `outline` at the given chord tolerance.
///
/// Order- and orientation-preserving: contours come out in input order
/// and are never reversed. An empty outline flattens to nothing.
#[must_use]
pub fn flatten(outline: &Outline, tolerance: f32) -> FlattenedOutline {
    let mut flat = FlattenedOutline::default();
    for range in outline.contours() {
        let points = &outline.points[range.clone()];
        let on_curve = &outline.on_curve[range];
        flatten_contour(points, on_curve, tolerance, &mut flat.points);
        if let Some(last) = flat.points.len().checked_sub(1) {
            flat.contour_ends.push(last as u32);
        }
    }
    flat
}

/// Flatten one contour into `out`.
///
/// The start anchor follows the implicit-start rule: the first point if
/// it is on-curve, else the last point if that is on-curve, else the
/// midpoint of (last, first). The closing edge back to the anchor is
/// left implicit for straight closes; a curved close emits its interior
/// chords but not the duplicate anchor.
fn flatten_contour(points: &[Point], on_curve: &[bool], tolerance: f32, out: &mut Vec<Point>) {
    let n = points.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        out.push(points[0]);
        return;
    }

    // (anchor, order of source indices still to consume)
    let (start, first, count) = if on_curve[0] {
        (points[0], 1, n - 1)
    } else if on_curve[n - 1] {
        (points[n - 1], 0, n - 1)
    } else {
        (points[n - 1].midpoint(points[0]), 0, n)
    };

    out.push(start);
    let mut current = start;
    let mut pending_ctrl: Option<Point> = None;

    for step in 0..count {
        let idx = (first + step) % n;
        let p = points[idx];
        if on_curve[idx] {
            match pending_ctrl.take() {
                None => out.push(p),
                Some(ctrl) => flatten_quad(QuadSegment::new(current, ctrl, p), tolerance, out),
            }
            current = p;
        } else if let Some(ctrl) = pending_ctrl.take() {
            // Two successive off-curve points: the implicit on-curve
            // midpoint ends one quad and starts the next.
            let mid = ctrl.midpoint(p);
            flatten_quad(QuadSegment::new(current, ctrl, mid), tolerance, out);
            current = mid;
            pending_ctrl = Some(p);
        } else {
            pending_ctrl = Some(p);
        }
    }

    // Close back to the anchor.
    if let Some(ctrl) = pending_ctrl {
        flatten_quad(QuadSegment::new(current, ctrl, start), tolerance, out);
        out.pop(); // the quad's endpoint duplicates the anchor
    }
}

/// Recursively bisect until flat enough or the depth cap is hit, then
/// emit the terminal endpoint. The segment's start is already emitted.
fn flatten_quad(segment: QuadSegment, tolerance: f32, out: &mut Vec<Point>) {
    fn recurse(segment: QuadSegment, tolerance: f32, depth: u32, out: &mut Vec<Point>) {
        if depth >= MAX_DEPTH || segment.flatness() <= tolerance {
            out.push(segment.p1);
            return;
        }
        let (left, right) = segment.split();
        recurse(left, tolerance, depth + 1, out);
        recurse(right, tolerance, depth + 1, out);
    }
    recurse(segment, tolerance, 0, out);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(points: &[(f32, f32)]) -> Outline {
        Outline {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            on_curve: vec![true; points.len()],
            contour_ends: vec![points.len() as u32 - 1],
        }
    }

    /// A single-contour outline with explicit on/off flags.
    fn contour(points: &[(f32, f32, bool)]) -> Outline {
        Outline {
            points: points.iter().map(|&(x, y, _)| Point::new(x, y)).collect(),
            on_curve: points.iter().map(|&(_, _, on)| on).collect(),
            contour_ends: vec![points.len() as u32 - 1],
        }
    }

    #[test]
    fn straight_polygon_passes_through() {
        let outline = polygon(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let flat = flatten(&outline, DEFAULT_TOLERANCE);
        assert_eq!(flat.points.len(), 3);
        assert_eq!(flat.points[0], Point::new(0.0, 0.0));
        assert_eq!(flat.contour_ends, vec![2]);
    }

    #[test]
    fn quad_subdivides_within_tolerance() {
        let seg = QuadSegment::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        );
        let outline = contour(&[(0.0, 0.0, true), (50.0, 100.0, false), (100.0, 0.0, true)]);
        let tol = 0.5;
        let flat = flatten(&outline, tol);
        assert!(flat.points.len() > 4, "curve should subdivide");

        // Invariant: every sampled curve point lies within `tol` of the
        // emitted polyline (checked against the nearest chord).
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let on_curve = seg.eval(t);
            let d = polyline_distance(&flat.points, on_curve);
            assert!(d <= tol + 1e-3, "deviation {d} at t={t}");
        }
    }

    #[test]
    fn degenerate_quad_hits_depth_cap_without_blowup() {
        // Control point far off a zero-length chord.
        let outline = contour(&[(0.0, 0.0, true), (1000.0, 0.0, false)]);
        let flat = flatten(&outline, 0.0001);
        // Bounded by the depth cap: at most 2 * 4096 points.
        assert!(flat.points.len() <= 8192 + 1);
        assert!(!flat.is_empty());
    }

    #[test]
    fn implicit_midpoints_between_double_off_curve() {
        // All-off-curve square: every vertex is a control point.
        let outline = contour(&[
            (0.0, 0.0, false),
            (100.0, 0.0, false),
            (100.0, 100.0, false),
            (0.0, 100.0, false),
        ]);
        let flat = flatten(&outline, 1.0);
        // Anchor is the midpoint of (last, first).
        assert_eq!(flat.points[0], Point::new(0.0, 50.0));
        assert!(flat.points.len() >= 8);
    }

    #[test]
    fn off_curve_start_uses_on_curve_last_point() {
        let outline = contour(&[
            (50.0, 100.0, false),
            (100.0, 0.0, true),
            (0.0, 0.0, true),
        ]);
        let flat = flatten(&outline, 5.0);
        assert_eq!(flat.points[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn multiple_contours_keep_order_and_markers() {
        let mut outline = polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        outline.points.extend([
            Point::new(100.0, 0.0),
            Point::new(110.0, 0.0),
            Point::new(105.0, 8.0),
        ]);
        outline.on_curve.extend([true; 3]);
        outline.contour_ends.push(5);

        let flat = flatten(&outline, DEFAULT_TOLERANCE);
        assert_eq!(flat.num_contours(), 2);
        assert_eq!(flat.contour_range(0), Some(0..3));
        assert_eq!(flat.contour_range(1), Some(3..6));
        assert_eq!(flat.points[3], Point::new(100.0, 0.0));
    }

    #[test]
    fn empty_outline_flattens_to_nothing() {
        let flat = flatten(&Outline::empty(), DEFAULT_TOLERANCE);
        assert!(flat.is_empty());
        assert_eq!(flat.num_contours(), 0);
    }

    #[test]
    fn split_halves_meet_on_the_curve() {
        let seg = QuadSegment::new(
            Point::new(0.0, 0.0),
            Point::new(40.0, 80.0),
            Point::new(100.0, 20.0),
        );
        let (left, right) = seg.split();
        assert_eq!(left.p1, right.p0);
        let mid = seg.eval(0.5);
        assert!((left.p1.x - mid.x).abs() < 1e-4);
        assert!((left.p1.y - mid.y).abs() < 1e-4);
    }

    /// Distance from `p` to the nearest segment of the closed polyline.
    fn polyline_distance(points: &[Point], p: Point) -> f32 {
        let mut best = f32::INFINITY;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            best = best.min(segment_distance(a, b, p));
        }
        best
    }

    fn segment_distance(a: Point, b: Point, p: Point) -> f32 {
        let ab = b - a;
        let ap = p - a;
        let len_sq = ab.x.mul_add(ab.x, ab.y * ab.y);
        let t = if len_sq <= f32::EPSILON {
            0.0
        } else {
            (ap.x.mul_add(ab.x, ap.y * ab.y) / len_sq).clamp(0.0, 1.0)
        };
        let q = a.lerp(b, t);
        (p.x - q.x).hypot(p.y - q.y)
    }
}
