//! Viewport onto the scene: coordinate mapping, pan and zoom.

use egui::{Pos2, Rect, Vec2};

use crate::geometry::ResizeCursor;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// Scene-to-screen mapping for one frame.
///
/// The scene is centered in the canvas, shifted by `pan` and scaled by `zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub canvas: Rect,
    pub pan: Vec2,
    pub zoom: f32,
    pub scene_size: Vec2,
}

impl ViewTransform {
    pub fn scene_to_screen(&self, pos: Pos2) -> Pos2 {
        self.canvas.center() + self.pan + (pos.to_vec2() - self.scene_size * 0.5) * self.zoom
    }

    pub fn screen_to_scene(&self, pos: Pos2) -> Pos2 {
        let rel = pos - self.canvas.center() - self.pan;
        (rel / self.zoom + self.scene_size * 0.5).to_pos2()
    }

    pub fn scene_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_two_pos(self.scene_to_screen(rect.min), self.scene_to_screen(rect.max))
    }

    /// Screen rectangle covered by the whole scene.
    pub fn scene_bounds_on_screen(&self) -> Rect {
        self.scene_rect_to_screen(Rect::from_min_size(Pos2::ZERO, self.scene_size))
    }
}

/// Pan and zoom state of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pan: Vec2,
    zoom: f32,
    panning: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            panning: false,
        }
    }
}

impl View {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn transform(&self, canvas: Rect, scene_size: Vec2) -> ViewTransform {
        ViewTransform {
            canvas,
            pan: self.pan,
            zoom: self.zoom,
            scene_size,
        }
    }

    /// Middle-button drag pans, the scroll wheel zooms about the cursor.
    pub fn handle_pan_zoom(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if ctx.input(|i| i.pointer.middle_down()) {
            self.pan += ctx.input(|i| i.pointer.delta());
            self.panning = true;
        } else {
            self.panning = false;
        }

        let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            let new_zoom = (self.zoom * (1.0 + scroll * 0.002)).clamp(MIN_ZOOM, MAX_ZOOM);
            if let Some(cursor) = response.hover_pos() {
                let cursor_rel = cursor - response.rect.center() - self.pan;
                self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
            }
            self.zoom = new_zoom;
        }
    }
}

impl From<ResizeCursor> for egui::CursorIcon {
    fn from(cursor: ResizeCursor) -> Self {
        match cursor {
            ResizeCursor::Default => egui::CursorIcon::Default,
            ResizeCursor::Vertical => egui::CursorIcon::ResizeVertical,
            ResizeCursor::Horizontal => egui::CursorIcon::ResizeHorizontal,
            ResizeCursor::BackDiagonal => egui::CursorIcon::ResizeNeSw,
            ResizeCursor::ForwardDiagonal => egui::CursorIcon::ResizeNwSe,
        }
    }
}
