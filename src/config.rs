//! Editor configuration.
//!
//! Settings are read from a JSON file. Every field has a default, so the file
//! may list only what it overrides, and a missing default file is not an error.

use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::geometry::Tolerance;
use crate::item::BoxStyle;

const CONFIG_DIR: &str = "boxeditor";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Background image shown under the boxes.
    pub image_path: Option<PathBuf>,
    /// Edge proximity tolerance as a fraction of the box extent.
    pub edge_tolerance: f32,
    /// Lower bound of the edge tolerance in scene units.
    pub min_edge_tolerance: f32,
    pub undo_limit: usize,
    pub window_size: [f32; 2],
    /// RGBA, unmultiplied.
    pub box_fill: [u8; 4],
    /// RGBA, unmultiplied.
    pub box_outline: [u8; 4],
    pub outline_width: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            edge_tolerance: 0.02,
            min_edge_tolerance: 3.0,
            undo_limit: 100,
            window_size: [1200.0, 800.0],
            box_fill: [94, 156, 235, 150],
            box_outline: [94, 156, 235, 255],
            outline_width: 3.0,
        }
    }
}

impl EditorConfig {
    /// `<config dir>/boxeditor/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EditorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| EditorError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given; otherwise the default file when it exists,
    /// otherwise the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.edge_tolerance.is_finite() || !(0.0..0.5).contains(&self.edge_tolerance) {
            return Err(EditorError::InvalidSetting {
                key: "edge_tolerance",
                reason: format!("must be in [0, 0.5), got {}", self.edge_tolerance),
            });
        }
        if !self.min_edge_tolerance.is_finite() || self.min_edge_tolerance < 0.0 {
            return Err(EditorError::InvalidSetting {
                key: "min_edge_tolerance",
                reason: format!("must be >= 0, got {}", self.min_edge_tolerance),
            });
        }
        if self.undo_limit == 0 {
            return Err(EditorError::InvalidSetting {
                key: "undo_limit",
                reason: "must be > 0".to_string(),
            });
        }
        if self.window_size.iter().any(|d| !(*d > 0.0)) {
            return Err(EditorError::InvalidSetting {
                key: "window_size",
                reason: format!("dimensions must be > 0, got {:?}", self.window_size),
            });
        }
        if !(self.outline_width > 0.0) {
            return Err(EditorError::InvalidSetting {
                key: "outline_width",
                reason: format!("must be > 0, got {}", self.outline_width),
            });
        }
        Ok(())
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.edge_tolerance, self.min_edge_tolerance)
    }

    pub fn box_style(&self) -> BoxStyle {
        let [r, g, b, a] = self.box_fill;
        let fill = Color32::from_rgba_unmultiplied(r, g, b, a);
        let [r, g, b, a] = self.box_outline;
        let outline = Color32::from_rgba_unmultiplied(r, g, b, a);
        BoxStyle {
            fill,
            outline,
            outline_width: self.outline_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tolerance(), Tolerance::new(0.02, 3.0));
        assert_eq!(config.box_style(), BoxStyle::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{ "image_path": "/tmp/page.ppm", "edge_tolerance": 0.05 }"#);
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.image_path, Some(PathBuf::from("/tmp/page.ppm")));
        assert_eq!(config.edge_tolerance, 0.05);
        assert_eq!(config.undo_limit, 100);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let file = write_config("{ not json");
        let err = EditorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, EditorError::ConfigParse { .. }));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let file = write_config(r#"{ "edge_tolerance": 0.7 }"#);
        let err = EditorConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            EditorError::InvalidSetting {
                key: "edge_tolerance",
                ..
            }
        ));

        let config = EditorConfig {
            undo_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EditorConfig {
            window_size: [0.0, 600.0],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_read_error() {
        let err = EditorConfig::load_or_default(Some(Path::new("/nonexistent/boxeditor.json")))
            .unwrap_err();
        assert!(matches!(err, EditorError::ConfigRead { .. }));
    }
}
