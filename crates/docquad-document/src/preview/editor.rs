// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive corner editing in preview space.

use docquad_core::{Corner, Point, Preview, PreviewBounds, Quad};
use tracing::debug;

/// Corner of `quad` closest to `point`; ties go to TL, TR, BL, BR in that
/// order.
pub fn nearest_corner(quad: &Quad<Preview>, point: Point) -> Corner {
    quad.nearest_corner(point)
}

/// `quad` with `corner` shifted by `(dx, dy)`.
///
/// No bounds check, re-ordering, or convexity fix-up happens here; callers
/// decide whether to accept the result (see [`inside_viewport`]).
pub fn move_corner(quad: &Quad<Preview>, corner: Corner, dx: f64, dy: f64) -> Quad<Preview> {
    quad.moved(corner, dx, dy)
}

/// Whether `point` lies within the drawn image area (edges included).
pub fn inside_viewport(point: Point, bounds: &PreviewBounds) -> bool {
    bounds.contains(point)
}

/// A touch-driven editing session over one preview quad.
///
/// `press` picks the corner nearest the touch, each `drag` moves it by the
/// delta since the previous touch, and `release` ends the gesture. A drag
/// whose candidate position leaves the bounds is dropped, but the touch
/// position is still recorded so the next delta is measured from it.
#[derive(Debug, Clone)]
pub struct QuadEditor {
    quad: Quad<Preview>,
    bounds: PreviewBounds,
    active: Option<Corner>,
    last_touch: Option<Point>,
}

impl QuadEditor {
    pub fn new(quad: Quad<Preview>, bounds: PreviewBounds) -> Self {
        Self {
            quad,
            bounds,
            active: None,
            last_touch: None,
        }
    }

    /// Start a gesture at `point`, selecting the nearest corner.
    pub fn press(&mut self, point: Point) -> Corner {
        let corner = nearest_corner(&self.quad, point);
        self.active = Some(corner);
        self.last_touch = Some(point);
        debug!(corner = %corner, point = %point, "Corner selected");
        corner
    }

    /// Continue the gesture at `point`. Returns `true` when the active corner
    /// moved.
    pub fn drag(&mut self, point: Point) -> bool {
        let (Some(corner), Some(previous)) = (self.active, self.last_touch) else {
            return false;
        };
        self.last_touch = Some(point);

        let (dx, dy) = (point.x - previous.x, point.y - previous.y);
        let candidate = self.quad.corner(corner).offset(dx, dy);
        if !inside_viewport(candidate, &self.bounds) {
            return false;
        }
        self.quad = move_corner(&self.quad, corner, dx, dy);
        true
    }

    /// End the gesture.
    pub fn release(&mut self) {
        self.active = None;
        self.last_touch = None;
    }

    pub fn quad(&self) -> &Quad<Preview> {
        &self.quad
    }

    pub fn bounds(&self) -> &PreviewBounds {
        &self.bounds
    }

    pub fn active_corner(&self) -> Option<Corner> {
        self.active
    }

    pub fn into_quad(self) -> Quad<Preview> {
        self.quad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> PreviewBounds {
        PreviewBounds { left: 0.0, top: 100.0, right: 300.0, bottom: 500.0 }
    }

    fn quad() -> Quad<Preview> {
        Quad::new(
            Point::new(20.0, 120.0),
            Point::new(280.0, 120.0),
            Point::new(20.0, 480.0),
            Point::new(280.0, 480.0),
        )
    }

    #[test]
    fn nearest_corner_picks_closest() {
        assert_eq!(nearest_corner(&quad(), Point::new(270.0, 470.0)), Corner::BottomRight);
        assert_eq!(nearest_corner(&quad(), Point::new(30.0, 130.0)), Corner::TopLeft);
    }

    #[test]
    fn nearest_corner_ties_follow_enumeration_order() {
        // Centre of the rectangle is equidistant from all four.
        assert_eq!(nearest_corner(&quad(), Point::new(150.0, 300.0)), Corner::TopLeft);
        // Midway between TR and BR.
        assert_eq!(nearest_corner(&quad(), Point::new(280.0, 300.0)), Corner::TopRight);
    }

    #[test]
    fn move_corner_touches_only_target() {
        let before = quad();
        let after = move_corner(&before, Corner::BottomLeft, 15.0, -10.0);
        assert_eq!(after.bottom_left, Point::new(35.0, 470.0));
        assert_eq!(after.top_left, before.top_left);
        assert_eq!(after.top_right, before.top_right);
        assert_eq!(after.bottom_right, before.bottom_right);
    }

    #[test]
    fn inside_viewport_includes_edges() {
        assert!(inside_viewport(Point::new(0.0, 100.0), &bounds()));
        assert!(inside_viewport(Point::new(300.0, 500.0), &bounds()));
        assert!(!inside_viewport(Point::new(150.0, 99.9), &bounds()));
        assert!(!inside_viewport(Point::new(300.1, 300.0), &bounds()));
    }

    #[test]
    fn drag_moves_active_corner_by_delta() {
        let mut editor = QuadEditor::new(quad(), bounds());
        assert_eq!(editor.press(Point::new(25.0, 125.0)), Corner::TopLeft);
        assert!(editor.drag(Point::new(35.0, 140.0)));
        assert!(editor.drag(Point::new(40.0, 150.0)));
        assert_eq!(editor.quad().top_left, Point::new(35.0, 145.0));
        assert_eq!(editor.quad().bottom_right, quad().bottom_right);
    }

    #[test]
    fn drag_outside_bounds_is_rejected_but_tracked() {
        let mut editor = QuadEditor::new(quad(), bounds());
        editor.press(Point::new(20.0, 120.0));
        // Would put TL at (20, 90), above the top edge.
        assert!(!editor.drag(Point::new(20.0, 90.0)));
        assert_eq!(editor.quad().top_left, Point::new(20.0, 120.0));
        // The next delta is measured from the rejected touch.
        assert!(editor.drag(Point::new(30.0, 100.0)));
        assert_eq!(editor.quad().top_left, Point::new(30.0, 130.0));
    }

    #[test]
    fn drag_without_press_does_nothing() {
        let mut editor = QuadEditor::new(quad(), bounds());
        assert!(!editor.drag(Point::new(50.0, 150.0)));
        assert_eq!(*editor.quad(), quad());
    }

    #[test]
    fn release_ends_gesture() {
        let mut editor = QuadEditor::new(quad(), bounds());
        editor.press(Point::new(280.0, 120.0));
        assert_eq!(editor.active_corner(), Some(Corner::TopRight));
        editor.release();
        assert_eq!(editor.active_corner(), None);
        assert!(!editor.drag(Point::new(200.0, 200.0)));
        assert_eq!(editor.into_quad(), quad());
    }

    #[test]
    fn edits_may_cross_edges() {
        let mut editor = QuadEditor::new(quad(), bounds());
        editor.press(Point::new(20.0, 480.0));
        assert!(editor.drag(Point::new(290.0, 130.0)));
        assert!(!editor.quad().is_simple() || !editor.quad().is_convex());
    }
}
