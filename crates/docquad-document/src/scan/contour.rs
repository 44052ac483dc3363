// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour simplification and four-sided candidate selection.

use docquad_core::geometry::{is_convex, polygon_area};
use docquad_core::{Point, ScanConfig};
use imageproc::contours::Contour;
use imageproc::geometry::arc_length;

/// A convex four-vertex polygon found in the shrunk detection image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Vertices in contour order (not yet labelled by corner role).
    pub points: [Point; 4],
    /// Enclosed area in shrunk-image px².
    pub area: f64,
}

/// Keep whichever of two optional candidates encloses more area.
///
/// Ties keep `current`, so earlier contours and channels win.
pub fn larger(current: Option<Candidate>, next: Option<Candidate>) -> Option<Candidate> {
    match (current, next) {
        (Some(a), Some(b)) if b.area > a.area => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}

/// Distance from `p` to the line through `a` and `b` (or to `a` when the two
/// coincide).
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return p.distance(a);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / length
}

/// Douglas–Peucker over `points[start..=end]`, marking survivors in `keep`.
fn simplify_range(points: &[Point], start: usize, end: usize, epsilon: f64, keep: &mut [bool]) {
    let mut stack = vec![(start, end)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut max_distance = 0.0;
        let mut index = first;
        for (i, &point) in points.iter().enumerate().take(last).skip(first + 1) {
            let distance = perpendicular_distance(point, points[first], points[last]);
            if distance > max_distance {
                max_distance = distance;
                index = i;
            }
        }
        if max_distance > epsilon {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }
}

fn farthest_from(points: &[Point], origin: Point) -> usize {
    let mut best = 0;
    let mut best_distance = -1.0;
    for (i, point) in points.iter().enumerate() {
        let distance = point.distance(origin);
        if distance > best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Approximate a closed curve by a polygon whose edges stay within
/// `epsilon` of the curve.
///
/// The curve is cut at two mutually distant points and each half is
/// simplified independently, so the result does not depend on where the
/// tracer happened to start.
pub fn approximate_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let far = farthest_from(points, points[0]);
    let start = farthest_from(points, points[far]);

    // Rotate so the walk starts at `start`, then close it.
    let mut ring: Vec<Point> = Vec::with_capacity(n + 1);
    ring.extend_from_slice(&points[start..]);
    ring.extend_from_slice(&points[..start]);
    ring.push(points[start]);

    let split = (far + n - start) % n;
    if split == 0 {
        // Every point coincides with the start.
        return vec![points[start]];
    }

    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[split] = true;
    simplify_range(&ring, 0, split, epsilon, &mut keep);
    simplify_range(&ring, split, n, epsilon, &mut keep);

    ring.iter()
        .take(n)
        .zip(&keep)
        .filter_map(|(&point, &kept)| kept.then_some(point))
        .collect()
}

/// Turn a traced border into a document candidate, if it qualifies: exactly
/// four vertices after approximation, area above the floor, and convex.
pub fn quad_candidate(contour: &Contour<i32>, config: &ScanConfig) -> Option<Candidate> {
    if contour.points.len() < 4 {
        return None;
    }

    let perimeter = arc_length(&contour.points, true);
    let epsilon = config.approx_tolerance_fraction * perimeter;
    let curve: Vec<Point> = contour
        .points
        .iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();

    let polygon = approximate_closed(&curve, epsilon);
    let points: [Point; 4] = polygon.try_into().ok()?;

    let area = polygon_area(&points).abs();
    if area <= config.min_area || !is_convex(&points) {
        return None;
    }
    Some(Candidate { points, area })
}

/// Largest qualifying candidate among `contours`.
pub fn best_candidate(contours: &[Contour<i32>], config: &ScanConfig) -> Option<Candidate> {
    contours
        .iter()
        .map(|contour| quad_candidate(contour, config))
        .fold(None, larger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::contours::BorderType;
    use imageproc::point::Point as PixelPoint;

    /// Pixel-by-pixel border of an axis-aligned rectangle, clockwise from
    /// `(x0, y0)`, the way a border tracer would emit it.
    fn rectangle_border(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<PixelPoint<i32>> {
        let mut points = Vec::new();
        for x in x0..x1 {
            points.push(PixelPoint::new(x, y0));
        }
        for y in y0..y1 {
            points.push(PixelPoint::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            points.push(PixelPoint::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            points.push(PixelPoint::new(x0, y));
        }
        points
    }

    fn contour(points: Vec<PixelPoint<i32>>) -> Contour<i32> {
        Contour {
            points,
            border_type: BorderType::Outer,
            parent: None,
        }
    }

    #[test]
    fn rectangle_border_simplifies_to_four_corners() {
        let border: Vec<Point> = rectangle_border(10, 20, 110, 80)
            .into_iter()
            .map(|p| Point::new(p.x as f64, p.y as f64))
            .collect();
        let polygon = approximate_closed(&border, 5.0);
        assert_eq!(polygon.len(), 4, "got {:?}", polygon);
        for corner in [
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
            Point::new(110.0, 80.0),
            Point::new(10.0, 80.0),
        ] {
            assert!(polygon.contains(&corner), "missing {:?} in {:?}", corner, polygon);
        }
    }

    #[test]
    fn start_point_does_not_change_result() {
        let mut border: Vec<Point> = rectangle_border(0, 0, 60, 40)
            .into_iter()
            .map(|p| Point::new(p.x as f64, p.y as f64))
            .collect();
        border.rotate_left(37);
        let polygon = approximate_closed(&border, 3.0);
        assert_eq!(polygon.len(), 4, "got {:?}", polygon);
    }

    #[test]
    fn collapsed_curve_yields_single_point() {
        let points = vec![Point::new(3.0, 3.0); 5];
        assert_eq!(approximate_closed(&points, 1.0), vec![Point::new(3.0, 3.0)]);
    }

    #[test]
    fn qualifying_rectangle_becomes_candidate() {
        let config = ScanConfig::default();
        let candidate = quad_candidate(&contour(rectangle_border(10, 10, 110, 90)), &config)
            .expect("candidate");
        assert!((candidate.area - 8000.0).abs() < 1e-6);
    }

    #[test]
    fn small_rectangle_is_rejected() {
        let config = ScanConfig::default();
        // 20 x 20 = 400 px², below the default floor of 1000.
        assert!(quad_candidate(&contour(rectangle_border(0, 0, 20, 20)), &config).is_none());
    }

    #[test]
    fn triangle_is_rejected() {
        let mut points = Vec::new();
        for i in 0..100 {
            points.push(PixelPoint::new(i, 0));
        }
        for i in 0..100 {
            points.push(PixelPoint::new(100 - i, i));
        }
        for i in 0..100 {
            points.push(PixelPoint::new(0, 100 - i));
        }
        assert!(quad_candidate(&contour(points), &ScanConfig::default()).is_none());
    }

    #[test]
    fn best_candidate_prefers_larger_area() {
        let config = ScanConfig::default();
        let contours = vec![
            contour(rectangle_border(0, 0, 50, 50)),
            contour(rectangle_border(0, 0, 200, 100)),
            contour(rectangle_border(5, 5, 60, 60)),
        ];
        let best = best_candidate(&contours, &config).expect("candidate");
        assert!((best.area - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn larger_keeps_first_on_tie() {
        let a = Candidate { points: [Point::new(0.0, 0.0); 4], area: 10.0 };
        let b = Candidate { points: [Point::new(1.0, 1.0); 4], area: 10.0 };
        assert_eq!(larger(Some(a), Some(b)), Some(a));
        assert_eq!(larger(None, Some(b)), Some(b));
        assert_eq!(larger(Some(a), None), Some(a));
        assert_eq!(larger(None, None), None);
    }
}
