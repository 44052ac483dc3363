// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: points, corner roles, edges, document quads, and the
// preview rectangle an image is drawn into.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::geometry;

/// A floating-point position in some coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// This point translated by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Original {}
    impl Sealed for super::Preview {}
}

/// Marker for the coordinate space a [`Quad`] lives in.
///
/// Quads in different spaces are different types, so handing an
/// original-space quad to code expecting preview coordinates does not
/// compile. The only conversions between the two live in the preview mapper.
pub trait CoordinateSpace:
    sealed::Sealed + Copy + fmt::Debug + PartialEq + Default + Send + Sync + 'static
{
    /// Human-readable name used in logs and error messages.
    const NAME: &'static str;
}

/// Pixel coordinates of the full-resolution photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Original;

/// Coordinates within the on-screen viewport, letterboxing included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preview;

impl CoordinateSpace for Original {
    const NAME: &'static str = "original";
}

impl CoordinateSpace for Preview {
    const NAME: &'static str = "preview";
}

/// Role of a corner within a document quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Fixed enumeration order, also used to break nearest-corner ties.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

/// A segment between two quad corners. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
}

impl Edge {
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }

    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }
}

/// Four document corners tagged by role, in coordinate space `S`.
///
/// Detection always yields a convex quad with `top_left`/`top_right` above
/// `bottom_left`/`bottom_right`. After user edits none of that is enforced:
/// a quad may be concave or even self-intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Quad<S: CoordinateSpace = Original> {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: CoordinateSpace> Quad<S> {
    /// Build a quad from corners given in [`Corner::ALL`] order.
    pub fn new(top_left: Point, top_right: Point, bottom_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            space: PhantomData,
        }
    }

    /// Label four unordered points geometrically.
    ///
    /// Sorts by `y`, splits into a top pair and a bottom pair, and sorts each
    /// pair by `x`. Documents rotated past roughly 45 degrees come out
    /// mislabelled.
    pub fn from_unordered(mut points: [Point; 4]) -> Self {
        points.sort_by(|a, b| a.y.total_cmp(&b.y));
        let (top, bottom) = points.split_at_mut(2);
        top.sort_by(|a, b| a.x.total_cmp(&b.x));
        bottom.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self::new(top[0], top[1], bottom[0], bottom[1])
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    pub fn set_corner(&mut self, corner: Corner, point: Point) {
        match corner {
            Corner::TopLeft => self.top_left = point,
            Corner::TopRight => self.top_right = point,
            Corner::BottomLeft => self.bottom_left = point,
            Corner::BottomRight => self.bottom_right = point,
        }
    }

    /// Copy of this quad with `corner` translated by `(dx, dy)`. The other
    /// three corners are untouched and nothing is re-ordered.
    pub fn moved(mut self, corner: Corner, dx: f64, dy: f64) -> Self {
        let point = self.corner(corner).offset(dx, dy);
        self.set_corner(corner, point);
        self
    }

    /// Corners paired with their roles, in [`Corner::ALL`] order.
    pub fn corners(&self) -> [(Corner, Point); 4] {
        Corner::ALL.map(|corner| (corner, self.corner(corner)))
    }

    /// Corners walked around the outline: TL, TR, BR, BL.
    pub fn outline(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// The four edges TL–TR, TR–BR, BR–BL, BL–TL.
    pub fn edges(&self) -> [Edge; 4] {
        let [tl, tr, br, bl] = self.outline();
        [
            Edge { from: tl, to: tr },
            Edge { from: tr, to: br },
            Edge { from: br, to: bl },
            Edge { from: bl, to: tl },
        ]
    }

    /// Corner closest to `point` by Euclidean distance; ties go to the
    /// earlier corner in [`Corner::ALL`].
    pub fn nearest_corner(&self, point: Point) -> Corner {
        let mut best = Corner::TopLeft;
        let mut best_distance = f64::INFINITY;
        for (corner, position) in self.corners() {
            let distance = position.distance(point);
            if distance < best_distance {
                best = corner;
                best_distance = distance;
            }
        }
        best
    }

    /// Enclosed area (shoelace over the outline). Meaningless for
    /// self-intersecting quads.
    pub fn area(&self) -> f64 {
        geometry::polygon_area(&self.outline()).abs()
    }

    pub fn is_convex(&self) -> bool {
        geometry::is_convex(&self.outline())
    }

    /// `false` when opposite edges cross each other (a "bow-tie").
    pub fn is_simple(&self) -> bool {
        let [top, right, bottom, left] = self.edges();
        !geometry::segments_cross(top.from, top.to, bottom.from, bottom.to)
            && !geometry::segments_cross(right.from, right.to, left.from, left.to)
    }

    pub fn is_finite(&self) -> bool {
        self.outline().iter().all(Point::is_finite)
    }

    /// Apply `f` to every corner, producing a quad in space `T`.
    ///
    /// This is the only way to move a quad between coordinate spaces; keep
    /// its callers to the preview mapper and scale-back steps.
    pub fn map_into<T: CoordinateSpace>(self, f: impl Fn(Point) -> Point) -> Quad<T> {
        Quad::new(
            f(self.top_left),
            f(self.top_right),
            f(self.bottom_left),
            f(self.bottom_right),
        )
    }
}

impl Quad<Original> {
    /// The image rectangle inset by `margin` on all sides.
    ///
    /// The margin shrinks to a quarter of the shorter matching side on small
    /// images so the result never inverts.
    pub fn inset_rect(width: f64, height: f64, margin: f64) -> Self {
        let margin_x = margin.min(width / 4.0).max(0.0);
        let margin_y = margin.min(height / 4.0).max(0.0);
        Self::new(
            Point::new(margin_x, margin_y),
            Point::new(width - margin_x, margin_y),
            Point::new(margin_x, height - margin_y),
            Point::new(width - margin_x, height - margin_y),
        )
    }
}

impl<S: CoordinateSpace> fmt::Display for Quad<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} quad [tl {}, tr {}, bl {}, br {}]",
            S::NAME,
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right
        )
    }
}

/// The rectangle, inside a fixed viewport, where the image is actually drawn
/// after an aspect-ratio-preserving fit. Everything else is letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PreviewBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x <= self.right
            && point.y <= self.bottom
    }

    /// `true` for zero-sized, inverted, or non-finite bounds.
    pub fn is_empty(&self) -> bool {
        let (width, height) = (self.width(), self.height());
        !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite()
    }
}

/// How a document's starting corners were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrigin {
    /// Found by the corner detector.
    Detected,
    /// Detection failed; the inset image rectangle was substituted.
    Fallback,
    /// Supplied or adjusted by the user.
    UserAdjusted,
}
