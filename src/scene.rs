//! The scene: background, z-ordered items, and pointer dispatch.
//!
//! Pointer events reach the scene first. A press on empty canvas creates a
//! new box that follows the pointer until release; a press on an item makes
//! that item the grabber, which then receives every move until release.

use egui::{Painter, Pos2, Rect, Vec2};

use crate::background::Background;
use crate::geometry::{ResizeCursor, Tolerance};
use crate::item::{BoxItem, BoxStyle, Buttons, CanvasItem, PointerEvent, PressOutcome};
use crate::view::ViewTransform;

/// The box being drawn by the current gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Creation {
    index: usize,
    anchor: Pos2,
}

type Snapshot = Vec<Box<dyn CanvasItem>>;

#[derive(Debug)]
pub struct Scene {
    background: Background,
    /// Bottom to top.
    items: Vec<Box<dyn CanvasItem>>,
    creating: Option<Creation>,
    grabber: Option<usize>,
    /// Items as they were when the current gesture started. Becomes an undo
    /// step on release if the gesture changed anything.
    pending: Option<Snapshot>,
    tolerance: Tolerance,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    undo_limit: usize,
}

impl Scene {
    pub fn new(background: Background, tolerance: Tolerance, undo_limit: usize) -> Self {
        Self {
            background,
            items: Vec::new(),
            creating: None,
            grabber: None,
            pending: None,
            tolerance,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_limit: undo_limit.max(1),
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    /// Swaps in a new background and starts over with no boxes.
    pub fn replace_background(&mut self, background: Background) {
        self.background = background;
        self.items.clear();
        self.creating = None;
        self.grabber = None;
        self.pending = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Scene size, taken from the background.
    pub fn size(&self) -> Vec2 {
        self.background.size()
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Box<dyn CanvasItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn is_creating(&self) -> bool {
        self.creating.is_some()
    }

    /// Whether a create, resize or move gesture is in progress.
    pub fn in_gesture(&self) -> bool {
        self.creating.is_some() || self.grabber.is_some()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_selected()).count()
    }

    /// Geometry of the topmost selected item.
    pub fn selected_rect(&self) -> Option<Rect> {
        self.items
            .iter()
            .rev()
            .find(|item| item.is_selected())
            .map(|item| item.bounds())
    }

    /// Topmost item accepting `pos`.
    fn item_at(&self, pos: Pos2) -> Option<usize> {
        self.items.iter().rposition(|item| item.hit_test(pos))
    }

    fn clear_selection(&mut self) {
        for item in &mut self.items {
            item.set_selected(false);
        }
    }

    fn select_only(&mut self, index: usize) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.set_selected(i == index);
        }
    }

    // ── Pointer dispatch ────────────────────────────────────────────────────

    pub fn pointer_pressed(&mut self, pos: Pos2, buttons: Buttons) {
        let event = PointerEvent::new(pos, buttons);
        match self.item_at(pos) {
            Some(index) => {
                let before = self.items.clone();
                let outcome = self.items[index].pointer_pressed(&event);
                if let PressOutcome::Resizing(edges) = outcome {
                    tracing::debug!(index, ?edges, "resize started");
                }
                if outcome.accepted() {
                    self.pending = Some(before);
                    if !self.items[index].is_selected() {
                        self.select_only(index);
                    }
                    self.grabber = Some(index);
                }
            }
            None if buttons.is_primary_only() && self.creating.is_none() => {
                self.pending = Some(self.items.clone());
                self.clear_selection();
                let mut item = BoxItem::new(Rect::from_min_max(pos, pos), self.tolerance);
                item.set_selected(true);
                self.items.push(Box::new(item));
                self.creating = Some(Creation {
                    index: self.items.len() - 1,
                    anchor: pos,
                });
                tracing::debug!(?pos, "box creation started");
            }
            None if self.creating.is_none() => self.clear_selection(),
            None => {}
        }
    }

    pub fn pointer_moved(&mut self, pos: Pos2, buttons: Buttons) {
        if buttons.is_primary_only() {
            if let Some(Creation { index, anchor }) = self.creating {
                self.items[index].set_bounds(Rect::from_two_pos(anchor, pos));
                return;
            }
        }
        if let Some(index) = self.grabber {
            self.items[index].pointer_moved(&PointerEvent::new(pos, buttons));
        }
    }

    pub fn pointer_released(&mut self, pos: Pos2, buttons: Buttons) {
        if let Some(Creation { index, .. }) = self.creating.take() {
            tracing::info!(rect = ?self.items[index].bounds(), "box created");
        }
        if let Some(index) = self.grabber.take() {
            self.items[index].pointer_released(&PointerEvent::new(pos, buttons));
        }
        if let Some(before) = self.pending.take() {
            if geometry_changed(&before, &self.items) {
                self.push_undo(before);
            }
        }
    }

    /// Hover pass with no buttons held. Returns the cursor to show.
    pub fn hover_moved(&mut self, pos: Pos2) -> ResizeCursor {
        let hovered = self.item_at(pos);
        let mut cursor = ResizeCursor::Default;
        for (i, item) in self.items.iter_mut().enumerate() {
            if Some(i) == hovered {
                cursor = item.hover_moved(pos);
            } else {
                item.hover_left();
            }
        }
        cursor
    }

    /// Pointer left the canvas.
    pub fn hover_left(&mut self) {
        for item in &mut self.items {
            item.hover_left();
        }
    }

    // ── Editing ─────────────────────────────────────────────────────────────

    /// Aborts the current gesture, restoring the scene as it was on press.
    pub fn cancel_gesture(&mut self) -> bool {
        if let Some(Creation { index, .. }) = self.creating.take() {
            self.items.remove(index);
            self.grabber = None;
            self.restore_selection_after_cancel();
            tracing::debug!("box creation cancelled");
            return true;
        }
        if let Some(index) = self.grabber.take() {
            let cancelled = self.items[index].cancel_interaction();
            self.restore_selection_after_cancel();
            tracing::debug!(cancelled, "drag cancelled");
            return cancelled;
        }
        false
    }

    /// Drops the snapshot taken when the cancelled gesture started, putting
    /// its selection state back.
    fn restore_selection_after_cancel(&mut self) {
        if let Some(before) = self.pending.take() {
            for (item, prev) in self.items.iter_mut().zip(&before) {
                item.set_selected(prev.is_selected());
            }
        }
    }

    /// Removes every selected item. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.in_gesture() {
            return 0;
        }
        let count = self.selected_count();
        if count > 0 {
            self.push_undo(self.items.clone());
            self.items.retain(|item| !item.is_selected());
            tracing::info!(count, "deleted boxes");
        }
        count
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.undo_limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.in_gesture() && !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.in_gesture() && !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        if let Some(prev) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.items, prev));
            self.hover_left();
            tracing::debug!(items = self.items.len(), "undo");
        }
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.items, next));
            self.hover_left();
            tracing::debug!(items = self.items.len(), "redo");
        }
        true
    }

    // ── Paint ───────────────────────────────────────────────────────────────

    pub fn paint(&self, painter: &Painter, transform: &ViewTransform, style: &BoxStyle) {
        self.background.paint(painter, transform);
        for item in &self.items {
            item.paint(painter, transform, style);
        }
    }
}

/// Whether `after` differs from `before` in its item set or any geometry.
/// Selection changes alone do not count.
fn geometry_changed(before: &[Box<dyn CanvasItem>], after: &[Box<dyn CanvasItem>]) -> bool {
    before.len() != after.len()
        || before
            .iter()
            .zip(after)
            .any(|(b, a)| b.bounds() != a.bounds())
}
