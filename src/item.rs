//! Canvas items: the shape interface the scene dispatches to, and the
//! rectangular annotation box that implements it.

use egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::geometry::{self, EdgeProximity, ResizeCursor, Tolerance};
use crate::view::ViewTransform;

// ── Pointer input ───────────────────────────────────────────────────────────

/// Mouse buttons held while an event was dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
    pub middle: bool,
}

impl Buttons {
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
        middle: false,
    };

    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
        middle: false,
    };

    /// True when the primary button is held and nothing else is.
    pub fn is_primary_only(&self) -> bool {
        *self == Self::PRIMARY
    }

    pub fn any(&self) -> bool {
        self.primary || self.secondary || self.middle
    }

    /// Records a press or release of `button`.
    pub fn set(&mut self, button: egui::PointerButton, pressed: bool) {
        match button {
            egui::PointerButton::Primary => self.primary = pressed,
            egui::PointerButton::Secondary => self.secondary = pressed,
            egui::PointerButton::Middle => self.middle = pressed,
            _ => {}
        }
    }
}

/// A pointer event in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pos: Pos2,
    pub buttons: Buttons,
}

impl PointerEvent {
    pub fn new(pos: Pos2, buttons: Buttons) -> Self {
        Self { pos, buttons }
    }
}

/// What an item did with a pointer press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// The item did not take the press.
    Ignored,
    /// The item armed a resize along the given edges.
    Resizing(EdgeProximity),
    /// The item started a drag-to-move.
    Moving,
}

impl PressOutcome {
    pub fn accepted(&self) -> bool {
        !matches!(self, PressOutcome::Ignored)
    }
}

// ── Style ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStyle {
    pub fill: Color32,
    pub outline: Color32,
    /// Selection outline width in scene units.
    pub outline_width: f32,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgba_unmultiplied(94, 156, 235, 150),
            outline: Color32::from_rgb(94, 156, 235),
            outline_width: 3.0,
        }
    }
}

// ── Item interface ──────────────────────────────────────────────────────────

/// A shape living in a [`crate::scene::Scene`].
///
/// The scene owns z-order, selection and mouse grabbing; an item only
/// answers hit tests, reacts to the events routed to it and paints itself.
pub trait CanvasItem: std::fmt::Debug {
    /// Current geometry in scene coordinates, always normalized.
    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, rect: Rect);

    /// Whether `pos` should be routed to this item.
    fn hit_test(&self, pos: Pos2) -> bool;

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);

    /// Pointer moved over the item with no buttons held.
    fn hover_moved(&mut self, pos: Pos2) -> ResizeCursor;

    /// Pointer is no longer over the item.
    fn hover_left(&mut self);

    fn pointer_pressed(&mut self, event: &PointerEvent) -> PressOutcome;

    fn pointer_moved(&mut self, event: &PointerEvent);

    fn pointer_released(&mut self, event: &PointerEvent);

    /// Rolls back an in-progress drag. Returns false if there was none.
    fn cancel_interaction(&mut self) -> bool;

    fn paint(&self, painter: &Painter, transform: &ViewTransform, style: &BoxStyle);

    fn clone_item(&self) -> Box<dyn CanvasItem>;
}

impl Clone for Box<dyn CanvasItem> {
    fn clone(&self) -> Self {
        self.clone_item()
    }
}

// ── Box item ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Interaction {
    Idle,
    Resizing { edges: EdgeProximity },
    Moving { last: Pos2 },
}

/// A selectable, movable, resizable rectangle.
#[derive(Clone, Debug)]
pub struct BoxItem {
    rect: Rect,
    selected: bool,
    tolerance: Tolerance,
    edges: EdgeProximity,
    interaction: Interaction,
    /// Geometry at the start of the current drag, restored on cancel.
    origin: Option<Rect>,
}

impl BoxItem {
    pub fn new(rect: Rect, tolerance: Tolerance) -> Self {
        Self {
            rect: geometry::normalized(rect),
            selected: false,
            tolerance,
            edges: EdgeProximity::NONE,
            interaction: Interaction::Idle,
            origin: None,
        }
    }
}

impl CanvasItem for BoxItem {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn set_bounds(&mut self, rect: Rect) {
        self.rect = geometry::normalized(rect);
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect
            .expand2(self.tolerance.margin(self.rect))
            .contains(pos)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn hover_moved(&mut self, pos: Pos2) -> ResizeCursor {
        self.edges = EdgeProximity::detect(self.rect, pos, self.tolerance);
        ResizeCursor::from(self.edges)
    }

    fn hover_left(&mut self) {
        self.edges = EdgeProximity::NONE;
    }

    fn pointer_pressed(&mut self, event: &PointerEvent) -> PressOutcome {
        if !event.buttons.is_primary_only() {
            return PressOutcome::Ignored;
        }
        self.origin = Some(self.rect);
        if self.edges.any() {
            self.interaction = Interaction::Resizing { edges: self.edges };
            PressOutcome::Resizing(self.edges)
        } else {
            self.interaction = Interaction::Moving { last: event.pos };
            PressOutcome::Moving
        }
    }

    fn pointer_moved(&mut self, event: &PointerEvent) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Resizing { edges } => {
                self.rect = geometry::apply_edges(self.rect, edges, event.pos);
            }
            Interaction::Moving { last } => {
                self.rect = self.rect.translate(event.pos - last);
                self.interaction = Interaction::Moving { last: event.pos };
            }
        }
    }

    fn pointer_released(&mut self, _event: &PointerEvent) {
        if self.interaction != Interaction::Idle {
            tracing::debug!(rect = ?self.rect, "drag finished");
        }
        self.interaction = Interaction::Idle;
        self.origin = None;
    }

    fn cancel_interaction(&mut self) -> bool {
        if self.interaction == Interaction::Idle {
            return false;
        }
        if let Some(origin) = self.origin.take() {
            self.rect = origin;
        }
        self.interaction = Interaction::Idle;
        true
    }

    fn paint(&self, painter: &Painter, transform: &ViewTransform, style: &BoxStyle) {
        let rect = transform.scene_rect_to_screen(self.rect);
        painter.rect_filled(rect, 0.0, style.fill);
        if self.selected {
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(style.outline_width * transform.zoom, style.outline),
                egui::StrokeKind::Middle,
            );
        }
    }

    fn clone_item(&self) -> Box<dyn CanvasItem> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn item(min: (f32, f32), max: (f32, f32)) -> BoxItem {
        BoxItem::new(
            Rect::from_min_max(pos2(min.0, min.1), pos2(max.0, max.1)),
            Tolerance::default(),
        )
    }

    fn primary(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(pos2(x, y), Buttons::PRIMARY)
    }

    #[test]
    fn test_new_normalizes() {
        let b = item((50.0, 80.0), (10.0, 10.0));
        assert_eq!(b.bounds(), Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 80.0)));
    }

    #[test]
    fn test_resize_right_edge_only_changes_right() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        assert_eq!(b.hover_moved(pos2(50.0, 40.0)), ResizeCursor::Horizontal);
        assert_eq!(
            b.pointer_pressed(&primary(50.0, 40.0)),
            PressOutcome::Resizing(EdgeProximity {
                right: true,
                ..EdgeProximity::NONE
            })
        );
        b.pointer_moved(&primary(70.0, 45.0));
        b.pointer_released(&primary(70.0, 45.0));
        assert_eq!(b.bounds(), Rect::from_min_max(pos2(10.0, 10.0), pos2(70.0, 80.0)));
    }

    #[test]
    fn test_resize_top_left_corner() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        assert_eq!(b.hover_moved(pos2(11.0, 11.0)), ResizeCursor::ForwardDiagonal);
        b.pointer_pressed(&primary(11.0, 11.0));
        b.pointer_moved(&primary(0.0, 5.0));
        assert_eq!(b.bounds(), Rect::from_min_max(pos2(0.0, 5.0), pos2(50.0, 80.0)));
    }

    #[test]
    fn test_press_in_body_moves() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        b.hover_moved(pos2(30.0, 40.0));
        assert_eq!(b.pointer_pressed(&primary(30.0, 40.0)), PressOutcome::Moving);
        b.pointer_moved(&primary(35.0, 30.0));
        b.pointer_moved(&primary(40.0, 50.0));
        assert_eq!(b.bounds(), Rect::from_min_max(pos2(20.0, 20.0), pos2(60.0, 90.0)));
    }

    #[test]
    fn test_press_without_hover_does_not_resize() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        assert_eq!(b.pointer_pressed(&primary(10.0, 10.0)), PressOutcome::Moving);
    }

    #[test]
    fn test_secondary_press_ignored() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        let event = PointerEvent::new(
            pos2(30.0, 30.0),
            Buttons {
                secondary: true,
                ..Buttons::NONE
            },
        );
        assert_eq!(b.pointer_pressed(&event), PressOutcome::Ignored);
    }

    #[test]
    fn test_release_always_disarms() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        b.hover_moved(pos2(50.0, 40.0));
        b.pointer_pressed(&primary(50.0, 40.0));
        b.pointer_released(&PointerEvent::new(pos2(50.0, 40.0), Buttons::NONE));
        b.pointer_moved(&primary(90.0, 40.0));
        assert_eq!(b.bounds().right(), 50.0);
    }

    #[test]
    fn test_cancel_restores_origin() {
        let mut b = item((10.0, 10.0), (50.0, 80.0));
        b.hover_moved(pos2(50.0, 80.0));
        b.pointer_pressed(&primary(50.0, 80.0));
        b.pointer_moved(&primary(120.0, 150.0));
        assert!(b.cancel_interaction());
        assert_eq!(b.bounds(), Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 80.0)));
        assert!(!b.cancel_interaction());
    }

    #[test]
    fn test_hover_left_disarms_edges() {
        let mut b = item((0.0, 0.0), (100.0, 100.0));
        assert_eq!(b.hover_moved(pos2(1.0, 1.0)), ResizeCursor::ForwardDiagonal);
        b.hover_left();
        assert_eq!(b.pointer_pressed(&primary(1.0, 1.0)), PressOutcome::Moving);
    }
}
