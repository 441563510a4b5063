//! Background image of the scene.

use std::path::{Path, PathBuf};

use egui::{Color32, ColorImage, Painter, Rect, TextureHandle, Vec2};

use crate::error::{EditorError, Result};
use crate::view::ViewTransform;

/// Scene size used when there is no image to take it from.
pub const DEFAULT_SCENE_SIZE: Vec2 = Vec2::new(800.0, 600.0);

pub struct Background {
    source: Option<PathBuf>,
    pixels: Option<ColorImage>,
    texture: Option<TextureHandle>,
    size: Vec2,
    message: Option<String>,
}

impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background")
            .field("source", &self.source)
            .field("size", &self.size)
            .field("loaded", &self.pixels.is_some())
            .field("message", &self.message)
            .finish()
    }
}

impl Background {
    /// Decodes the image at `path`. Its pixel size becomes the scene size.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| EditorError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());
        tracing::info!(
            path = %path.display(),
            width = size[0],
            height = size[1],
            "loaded background"
        );

        Ok(Self {
            source: Some(path.to_path_buf()),
            pixels: Some(pixels),
            texture: None,
            size: Vec2::new(size[0] as f32, size[1] as f32),
            message: None,
        })
    }

    /// An empty background of `size`, optionally showing `message`.
    pub fn placeholder(size: Vec2, message: Option<String>) -> Self {
        Self {
            source: None,
            pixels: None,
            texture: None,
            size,
            message,
        }
    }

    /// Loads `path`, falling back to a placeholder that shows the error.
    pub fn load_or_placeholder(path: &Path) -> Self {
        match Self::load(path) {
            Ok(bg) => bg,
            Err(err) => {
                tracing::error!("{err}");
                Self::placeholder(DEFAULT_SCENE_SIZE, Some(err.to_string()))
            }
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }

    /// Load error or hint shown in place of the image.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(pixels) = &self.pixels {
            self.texture = Some(ctx.load_texture(
                "background",
                pixels.clone(),
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    /// Draws the image stretched over the scene bounds.
    pub fn paint(&self, painter: &Painter, transform: &ViewTransform) {
        let target = transform.scene_bounds_on_screen();
        match &self.texture {
            Some(tex) => {
                painter.image(
                    tex.id(),
                    target,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(target, 0.0, Color32::from_gray(60));
                if let Some(message) = &self.message {
                    painter.text(
                        target.center(),
                        egui::Align2::CENTER_CENTER,
                        message,
                        egui::FontId::proportional(16.0),
                        Color32::from_gray(200),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_uses_image_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        image::RgbaImage::new(32, 16).save(&path).unwrap();

        let bg = Background::load(&path).unwrap();
        assert!(bg.is_loaded());
        assert_eq!(bg.size(), Vec2::new(32.0, 16.0));
        assert_eq!(bg.source(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_image_reports_error() {
        let err = Background::load(Path::new("/nonexistent/bg.ppm")).unwrap_err();
        assert!(matches!(err, EditorError::ImageLoad { .. }));
    }

    #[test]
    fn test_placeholder_keeps_message() {
        let bg = Background::load_or_placeholder(Path::new("/nonexistent/bg.ppm"));
        assert!(!bg.is_loaded());
        assert_eq!(bg.size(), DEFAULT_SCENE_SIZE);
        assert!(bg.message().unwrap().contains("bg.ppm"));
    }
}
