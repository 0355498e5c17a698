//! Configuration - Editorial Targets and Bundle Layout
//!
//! Every field has a default; a config file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bundle::BundleError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselConfig {
    #[serde(default)]
    pub editorial: EditorialConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
}

impl CarouselConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, BundleError> {
        let content = fs::read_to_string(path).map_err(|e| BundleError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| BundleError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Recommended (soft) targets. Values outside them only produce warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorialConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_min_slides")]
    pub min_slides: usize,
    #[serde(default = "default_max_slides")]
    pub max_slides: usize,
    #[serde(default = "default_max_text_only_ratio")]
    pub max_text_only_ratio: f64,
    #[serde(default = "default_font_scale_min")]
    pub font_scale_min: f64,
    #[serde(default = "default_font_scale_max")]
    pub font_scale_max: f64,
}

fn default_canvas_width() -> u32 { 1080 }
fn default_canvas_height() -> u32 { 1440 }
fn default_min_slides() -> usize { 8 }
fn default_max_slides() -> usize { 12 }
fn default_max_text_only_ratio() -> f64 { 0.4 }
fn default_font_scale_min() -> f64 { 0.7 }
fn default_font_scale_max() -> f64 { 1.3 }

impl Default for EditorialConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            min_slides: default_min_slides(),
            max_slides: default_max_slides(),
            max_text_only_ratio: default_max_text_only_ratio(),
            font_scale_min: default_font_scale_min(),
            font_scale_max: default_font_scale_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    /// Only references starting with this prefix are packed.
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
    #[serde(default = "default_schema_entry")]
    pub schema_entry: String,
    /// Also pack files under `<root>/assets/` that no slide references.
    #[serde(default = "default_true")]
    pub include_unreferenced: bool,
}

fn default_asset_prefix() -> String { "assets/".to_string() }
fn default_schema_entry() -> String { "schema.json".to_string() }
fn default_true() -> bool { true }

impl BundleConfig {
    /// Directory name implied by the asset prefix (`assets/` -> `assets`).
    pub fn asset_dir_name(&self) -> &str {
        self.asset_prefix.trim_end_matches('/')
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            asset_prefix: default_asset_prefix(),
            schema_entry: default_schema_entry(),
            include_unreferenced: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CarouselConfig =
            serde_json::from_str(r#"{"editorial": {"maxSlides": 15}}"#).unwrap();
        assert_eq!(config.editorial.max_slides, 15);
        assert_eq!(config.editorial.min_slides, 8);
        assert_eq!(config.editorial.canvas_width, 1080);
        assert_eq!(config.bundle.asset_prefix, "assets/");
        assert!(config.bundle.include_unreferenced);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bundle": {{"includeUnreferenced": false}}}}"#).unwrap();
        let config = CarouselConfig::load_from_path(file.path()).unwrap();
        assert!(!config.bundle.include_unreferenced);
        assert_eq!(config.bundle.asset_dir_name(), "assets");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CarouselConfig::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, BundleError::Config(_)));
    }
}
