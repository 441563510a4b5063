//! eframe application: toolbar, canvas and status bar around the scene.

use std::path::Path;

use eframe::egui;

use crate::background::{Background, DEFAULT_SCENE_SIZE};
use crate::config::EditorConfig;
use crate::geometry::ResizeCursor;
use crate::item::{BoxStyle, Buttons};
use crate::scene::Scene;
use crate::view::{View, ViewTransform};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "ppm", "pgm", "pbm", "bmp", "tif", "tiff",
];

pub fn window_title(image: Option<&Path>) -> String {
    match image.and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
        Some(name) => format!("boxeditor - {name}"),
        None => "boxeditor".to_string(),
    }
}

pub struct BoxEditorApp {
    scene: Scene,
    view: View,
    style: BoxStyle,
    buttons: Buttons,
    cursor: ResizeCursor,
    /// Last error from an action the user took, shown in the status bar.
    status: Option<String>,
}

impl BoxEditorApp {
    pub fn new(config: &EditorConfig) -> Self {
        let background = match &config.image_path {
            Some(path) => Background::load_or_placeholder(path),
            None => Background::placeholder(
                DEFAULT_SCENE_SIZE,
                Some("No image loaded. Use \"Open image\" to pick one.".to_string()),
            ),
        };

        Self {
            scene: Scene::new(background, config.tolerance(), config.undo_limit),
            view: View::default(),
            style: config.box_style(),
            buttons: Buttons::NONE,
            cursor: ResizeCursor::Default,
            status: None,
        }
    }

    fn open_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match Background::load(&path) {
            Ok(background) => {
                self.scene.replace_background(background);
                self.view.reset();
                self.status = None;
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(window_title(Some(&path))));
            }
            Err(err) => {
                tracing::error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.modifiers.command && i.key_pressed(egui::Key::Z) {
                if i.modifiers.shift {
                    self.scene.redo();
                } else {
                    self.scene.undo();
                }
            }
            if i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace) {
                self.scene.delete_selected();
            }
            if i.key_pressed(egui::Key::Escape) {
                self.scene.cancel_gesture();
            }
        });
    }

    /// Feeds this frame's raw pointer events to the scene, in order.
    fn dispatch_pointer(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        transform: &ViewTransform,
    ) {
        let canvas = response.rect;
        let events = ctx.input(|i| i.events.clone());

        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    // Middle button belongs to the view.
                    if button == egui::PointerButton::Middle {
                        continue;
                    }
                    self.buttons.set(button, pressed);
                    let scene_pos = transform.screen_to_scene(pos);
                    if !pressed {
                        self.scene.pointer_released(scene_pos, self.buttons);
                    } else if canvas.contains(pos) && response.contains_pointer() {
                        self.scene.pointer_pressed(scene_pos, self.buttons);
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let scene_pos = transform.screen_to_scene(pos);
                    if self.buttons.any() {
                        self.scene.pointer_moved(scene_pos, self.buttons);
                    } else if canvas.contains(pos) {
                        self.cursor = self.scene.hover_moved(scene_pos);
                    } else {
                        self.scene.hover_left();
                        self.cursor = ResizeCursor::Default;
                    }
                }
                egui::Event::PointerGone => {
                    self.scene.hover_left();
                    self.cursor = ResizeCursor::Default;
                }
                _ => {}
            }
        }

        // A release can get lost, e.g. when the window loses focus mid-drag.
        if self.buttons.any() && !ctx.input(|i| i.pointer.any_down()) {
            let pos = ctx
                .input(|i| i.pointer.latest_pos())
                .map(|p| transform.screen_to_scene(p))
                .unwrap_or_default();
            self.buttons = Buttons::NONE;
            self.scene.pointer_released(pos, self.buttons);
        }
    }

    fn status_text(&self) -> Option<(String, bool)> {
        if let Some(status) = &self.status {
            return Some((status.clone(), true));
        }
        let background = self.scene.background();
        if let Some(message) = background.message() {
            return Some((message.to_string(), !background.is_loaded()));
        }
        background
            .source()
            .map(|path| (path.display().to_string(), false))
    }
}

impl eframe::App for BoxEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.scene.background_mut().ensure_texture(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open image").clicked() {
                    self.open_image(ctx);
                }
                ui.separator();
                if ui
                    .add_enabled(self.scene.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.scene.undo();
                }
                if ui
                    .add_enabled(self.scene.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.scene.redo();
                }
                if ui
                    .add_enabled(self.scene.selected_count() > 0, egui::Button::new("Delete"))
                    .clicked()
                {
                    self.scene.delete_selected();
                }
                ui.separator();
                if ui.button("Reset view").clicked() {
                    self.view.reset();
                }
                ui.label(format!("Zoom: {:.0}%", self.view.zoom() * 100.0));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.status_text() {
                    Some((text, true)) => {
                        ui.colored_label(egui::Color32::from_rgb(230, 90, 80), text);
                    }
                    Some((text, false)) => {
                        ui.label(text);
                    }
                    None => {}
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(rect) = self.scene.selected_rect() {
                        ui.label(format!(
                            "({:.0}, {:.0}) - ({:.0}, {:.0})",
                            rect.left(),
                            rect.top(),
                            rect.right(),
                            rect.bottom()
                        ));
                        ui.separator();
                    }
                    if self.scene.is_empty() {
                        ui.label("no boxes");
                    } else {
                        ui.label(format!("{} boxes", self.scene.len()));
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            self.view.handle_pan_zoom(ctx, &response);
            let transform = self.view.transform(canvas_rect, self.scene.size());
            if !self.view.is_panning() {
                self.dispatch_pointer(ctx, &response, &transform);
            }

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));
            self.scene.paint(&painter.with_clip_rect(canvas_rect), &transform, &self.style);

            if response.hovered() {
                let icon = if self.view.is_panning() {
                    egui::CursorIcon::Grabbing
                } else {
                    self.cursor.into()
                };
                ctx.set_cursor_icon(icon);
            }
        });
    }
}
