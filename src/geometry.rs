//! Rectangle helpers, edge proximity and resize cursor selection.
//!
//! Boxes are stored as [`egui::Rect`] in scene coordinates, with
//! `min` as the top-left corner and `max` as the bottom-right one.

use egui::{Pos2, Rect, Vec2};

/// Returns `rect` with `left <= right` and `top <= bottom`.
pub fn normalized(rect: Rect) -> Rect {
    Rect::from_two_pos(rect.min, rect.max)
}

/// Moves the flagged sides of `rect` to `pos` and normalizes the result.
///
/// Setting two adjacent sides drags the corner between them.
pub fn apply_edges(rect: Rect, edges: EdgeProximity, pos: Pos2) -> Rect {
    let mut rect = rect;
    if edges.left {
        rect.min.x = pos.x;
    }
    if edges.right {
        rect.max.x = pos.x;
    }
    if edges.top {
        rect.min.y = pos.y;
    }
    if edges.bottom {
        rect.max.y = pos.y;
    }
    normalized(rect)
}

/// How close the pointer has to be to an edge to arm it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Fraction of the box extent along the tested axis.
    pub relative: f32,
    /// Lower bound in scene units, so thin boxes stay resizable.
    pub minimum: f32,
}

impl Tolerance {
    pub const fn new(relative: f32, minimum: f32) -> Self {
        Self { relative, minimum }
    }

    /// Tolerance along an axis whose extent is `extent`.
    pub fn along(&self, extent: f32) -> f32 {
        (extent.abs() * self.relative).max(self.minimum)
    }

    /// Per-axis tolerance for `rect`.
    pub fn margin(&self, rect: Rect) -> Vec2 {
        Vec2::new(self.along(rect.width()), self.along(rect.height()))
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(0.02, 3.0)
    }
}

/// Which sides of a box the pointer is currently near.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeProximity {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeProximity {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    /// Recomputes the flags for `pos` against `rect`.
    ///
    /// Only a pointer inside `rect` grown by the tolerance can arm an edge;
    /// anywhere else every flag is false. At most one side per axis is set:
    /// on boxes thinner than twice the tolerance the nearer side wins, and
    /// on a tie the right or bottom side does.
    pub fn detect(rect: Rect, pos: Pos2, tolerance: Tolerance) -> Self {
        let margin = tolerance.margin(rect);
        if !rect.expand2(margin).contains(pos) {
            return Self::NONE;
        }
        let (left, right) = nearer_side(pos.x, rect.left(), rect.right(), margin.x);
        let (top, bottom) = nearer_side(pos.y, rect.top(), rect.bottom(), margin.y);
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Flags for the low and high side of one axis, never both.
fn nearer_side(value: f32, low: f32, high: f32, margin: f32) -> (bool, bool) {
    let to_low = (value - low).abs();
    let to_high = (value - high).abs();
    match (to_low <= margin, to_high <= margin) {
        (true, true) => (to_low < to_high, to_low >= to_high),
        flags => flags,
    }
}

/// Cursor glyph to show while hovering a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeCursor {
    #[default]
    Default,
    Vertical,
    Horizontal,
    /// `/` shaped: top-right or bottom-left corner.
    BackDiagonal,
    /// `\` shaped: top-left or bottom-right corner.
    ForwardDiagonal,
}

impl From<EdgeProximity> for ResizeCursor {
    fn from(edges: EdgeProximity) -> Self {
        let EdgeProximity {
            left,
            right,
            top,
            bottom,
        } = edges;

        // Later matches win, so corners override single edges.
        let mut cursor = ResizeCursor::Default;
        if top || bottom {
            cursor = ResizeCursor::Vertical;
        }
        if left || right {
            cursor = ResizeCursor::Horizontal;
        }
        if (top && right) || (bottom && left) {
            cursor = ResizeCursor::BackDiagonal;
        }
        if (top && left) || (bottom && right) {
            cursor = ResizeCursor::ForwardDiagonal;
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn square() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0))
    }

    fn relative_only() -> Tolerance {
        Tolerance::new(0.02, 0.0)
    }

    #[test]
    fn test_apply_edges_keeps_rect_normalized() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 50.0));
        let all = EdgeProximity {
            left: true,
            right: true,
            top: true,
            bottom: true,
        };
        let samples = [-200.0, -1.0, 0.0, 10.0, 30.0, 50.0, 51.0, 400.0];
        for &x in &samples {
            for &y in &samples {
                for edges in [
                    EdgeProximity {
                        left: true,
                        ..EdgeProximity::NONE
                    },
                    EdgeProximity {
                        right: true,
                        bottom: true,
                        ..EdgeProximity::NONE
                    },
                    EdgeProximity {
                        top: true,
                        left: true,
                        ..EdgeProximity::NONE
                    },
                    all,
                ] {
                    let r = apply_edges(rect, edges, pos2(x, y));
                    assert!(r.left() <= r.right(), "{r:?}");
                    assert!(r.top() <= r.bottom(), "{r:?}");
                }
            }
        }
    }

    #[test]
    fn test_apply_edges_drag_left_past_right_flips() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 50.0));
        let edges = EdgeProximity {
            left: true,
            ..EdgeProximity::NONE
        };
        let r = apply_edges(rect, edges, pos2(80.0, 20.0));
        assert_eq!(r, Rect::from_min_max(pos2(50.0, 10.0), pos2(80.0, 50.0)));
    }

    #[test]
    fn test_detect_single_edges() {
        let tol = relative_only();
        let left = EdgeProximity::detect(square(), pos2(1.0, 50.0), tol);
        assert!(left.left && !left.right && !left.top && !left.bottom);

        let right = EdgeProximity::detect(square(), pos2(99.0, 50.0), tol);
        assert!(right.right && !right.left);

        let bottom = EdgeProximity::detect(square(), pos2(50.0, 101.5), tol);
        assert!(bottom.bottom && !bottom.top);
    }

    #[test]
    fn test_detect_corner_is_forward_diagonal() {
        let edges = EdgeProximity::detect(square(), pos2(1.0, 1.0), relative_only());
        assert!(edges.left && edges.top);
        assert_eq!(ResizeCursor::from(edges), ResizeCursor::ForwardDiagonal);
    }

    #[test]
    fn test_detect_interior_and_outside() {
        let tol = Tolerance::default();
        assert_eq!(
            EdgeProximity::detect(square(), pos2(50.0, 50.0), tol),
            EdgeProximity::NONE
        );
        // Level with the left edge but far below the box.
        assert_eq!(
            EdgeProximity::detect(square(), pos2(1.0, 300.0), tol),
            EdgeProximity::NONE
        );
    }

    #[test]
    fn test_minimum_tolerance_for_thin_boxes() {
        let thin = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 200.0));
        let edges = EdgeProximity::detect(thin, pos2(2.5, 100.0), Tolerance::new(0.02, 3.0));
        assert!(edges.left);
        assert!(!edges.right);
    }

    #[test]
    fn test_narrow_box_arms_one_side_per_axis() {
        let narrow = Rect::from_min_max(pos2(10.0, 10.0), pos2(14.0, 40.0));
        let tol = Tolerance::new(0.02, 3.0);

        let edges = EdgeProximity::detect(narrow, pos2(13.0, 25.0), tol);
        assert!(edges.right && !edges.left);
        let edges = EdgeProximity::detect(narrow, pos2(11.0, 25.0), tol);
        assert!(edges.left && !edges.right);

        // Equidistant: the right side wins, so the box can still grow.
        let edges = EdgeProximity::detect(narrow, pos2(12.0, 25.0), tol);
        assert!(edges.right && !edges.left);
        let r = apply_edges(narrow, edges, pos2(30.0, 25.0));
        assert_eq!(r, Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 40.0)));
    }

    #[test]
    fn test_zero_size_box_grows_from_bottom_right() {
        let point = Rect::from_min_max(pos2(20.0, 20.0), pos2(20.0, 20.0));
        let edges = EdgeProximity::detect(point, pos2(20.0, 20.0), Tolerance::default());
        assert_eq!(
            edges,
            EdgeProximity {
                right: true,
                bottom: true,
                ..EdgeProximity::NONE
            }
        );
        let r = apply_edges(point, edges, pos2(45.0, 35.0));
        assert_eq!(r, Rect::from_min_max(pos2(20.0, 20.0), pos2(45.0, 35.0)));
    }

    #[test]
    fn test_cursor_for_edges() {
        let e = |left, right, top, bottom| EdgeProximity {
            left,
            right,
            top,
            bottom,
        };
        assert_eq!(ResizeCursor::from(e(false, false, false, false)), ResizeCursor::Default);
        assert_eq!(ResizeCursor::from(e(false, false, true, false)), ResizeCursor::Vertical);
        assert_eq!(ResizeCursor::from(e(false, false, false, true)), ResizeCursor::Vertical);
        assert_eq!(ResizeCursor::from(e(true, false, false, false)), ResizeCursor::Horizontal);
        assert_eq!(ResizeCursor::from(e(false, true, false, false)), ResizeCursor::Horizontal);
        assert_eq!(ResizeCursor::from(e(false, true, true, false)), ResizeCursor::BackDiagonal);
        assert_eq!(ResizeCursor::from(e(true, false, false, true)), ResizeCursor::BackDiagonal);
        assert_eq!(ResizeCursor::from(e(true, false, true, false)), ResizeCursor::ForwardDiagonal);
        assert_eq!(ResizeCursor::from(e(false, true, false, true)), ResizeCursor::ForwardDiagonal);
    }
}
