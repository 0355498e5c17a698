use serde_json::{Map, Value};
use tracing::debug;

use super::{display_value, is_truthy, validate_slide, IdentityRegistry, ValidationReport};
use crate::catalog::{is_valid_font, REQUIRED_THEME_COLORS, REQUIRED_TYPOGRAPHY};
use crate::config::EditorialConfig;

/// A document-level rule. Rules run in registration order, and that order is
/// the order of the findings they emit.
pub trait DocumentRule {
    fn name(&self) -> &'static str;
    fn check(&self, doc: &Map<String, Value>, config: &EditorialConfig, report: &mut ValidationReport);
}

/// Required top-level fields and their shapes.
pub struct StructureRule;

impl DocumentRule for StructureRule {
    fn name(&self) -> &'static str { "structure" }

    fn check(&self, doc: &Map<String, Value>, _config: &EditorialConfig, report: &mut ValidationReport) {
        if !doc.get("version").is_some_and(Value::is_number) {
            report.error("version", "Field 'version' is missing or not a number");
        }
        if !doc.get("slides").is_some_and(Value::is_array) {
            report.error("slides", "Field 'slides' is missing or not an array");
        }
        if !doc.get("theme").is_some_and(Value::is_object) {
            report.error("theme", "Field 'theme' is missing or not an object");
        }
        if !doc.get("canvas").is_some_and(Value::is_object) {
            report.error("canvas", "Field 'canvas' is missing or not an object");
        }
    }
}

/// Recommended canvas dimensions.
pub struct CanvasRule;

impl DocumentRule for CanvasRule {
    fn name(&self) -> &'static str { "canvas" }

    fn check(&self, doc: &Map<String, Value>, config: &EditorialConfig, report: &mut ValidationReport) {
        let Some(canvas) = doc.get("canvas").and_then(Value::as_object) else {
            return;
        };
        for (field, expected) in [("width", config.canvas_width), ("height", config.canvas_height)] {
            let actual = canvas.get(field);
            if actual.and_then(Value::as_f64) != Some(f64::from(expected)) {
                report.warning(
                    self.name(),
                    format!(
                        "canvas.{field} should be {expected} (found {})",
                        display_value(actual)
                    ),
                );
            }
        }
    }
}

/// Title, header and footer are optional but expected.
pub struct MetadataRule;

impl DocumentRule for MetadataRule {
    fn name(&self) -> &'static str { "metadata" }

    fn check(&self, doc: &Map<String, Value>, _config: &EditorialConfig, report: &mut ValidationReport) {
        if !is_truthy(doc.get("title")) {
            report.warning("title", "Field 'title' is empty");
        }
        match doc.get("header").and_then(Value::as_object) {
            None => report.warning("header", "Field 'header' is missing"),
            Some(header) if !is_truthy(header.get("handle")) => {
                report.warning("header", "header.handle is empty")
            }
            Some(_) => {}
        }
        if !doc.get("footer").is_some_and(Value::is_object) {
            report.warning("footer", "Field 'footer' is missing");
        }
    }
}

/// Theme colors, typography and font scale.
pub struct ThemeRule;

impl DocumentRule for ThemeRule {
    fn name(&self) -> &'static str { "theme" }

    fn check(&self, doc: &Map<String, Value>, config: &EditorialConfig, report: &mut ValidationReport) {
        let Some(theme) = doc.get("theme").and_then(Value::as_object) else {
            return;
        };

        let empty = Map::new();
        match theme.get("colors").map_or(Some(&empty), Value::as_object) {
            Some(colors) => {
                for role in missing_keys(colors, &REQUIRED_THEME_COLORS) {
                    report.error("theme_colors", format!("theme.colors is missing required color: {role}"));
                }
            }
            None => report.error("theme_colors", "theme.colors is not an object"),
        }

        // Typography warnings follow document key order.
        match theme.get("typography").map_or(Some(&empty), Value::as_object) {
            Some(typography) => {
                for category in missing_keys(typography, &REQUIRED_TYPOGRAPHY) {
                    report.error(
                        "theme_typography",
                        format!("theme.typography is missing category: {category}"),
                    );
                }
                for (category, style) in typography {
                    let family = style.as_object().and_then(|s| s.get("family"));
                    if is_truthy(family) && !family.and_then(Value::as_str).is_some_and(is_valid_font) {
                        report.warning(
                            "font_family",
                            format!(
                                "theme.typography.{category}.family '{}' is not in the valid font list",
                                display_value(family)
                            ),
                        );
                    }
                }
            }
            None => report.error("theme_typography", "theme.typography is not an object"),
        }

        if let Some(scale) = theme.get("fontScale").and_then(Value::as_number) {
            let value = scale.as_f64().unwrap_or_default();
            if value < config.font_scale_min || value > config.font_scale_max {
                report.warning(
                    "font_scale",
                    format!(
                        "theme.fontScale={scale} outside the recommended range ({}-{})",
                        config.font_scale_min, config.font_scale_max
                    ),
                );
            }
        }
    }
}

/// Required keys absent from `map`, sorted by name.
fn missing_keys<'a>(map: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect();
    missing.sort_unstable();
    missing
}

/// Entry point: validates a whole CarouselSchema v1 document.
///
/// Pure and reentrant. Each call owns a fresh `IdentityRegistry`, so one
/// validator can serve any number of documents, including concurrently.
pub struct Validator {
    config: EditorialConfig,
    rules: Vec<Box<dyn DocumentRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_config(EditorialConfig::default())
    }

    pub fn with_config(config: EditorialConfig) -> Self {
        Self {
            config,
            rules: vec![
                Box::new(StructureRule),
                Box::new(CanvasRule),
                Box::new(MetadataRule),
                Box::new(ThemeRule),
            ],
        }
    }

    pub fn config(&self) -> &EditorialConfig {
        &self.config
    }

    pub fn validate(&self, document: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(doc) = document.as_object() else {
            report.error("document", "Document must be a JSON object");
            return report;
        };

        for rule in &self.rules {
            rule.check(doc, &self.config, &mut report);
        }

        let Some(slides) = doc.get("slides").and_then(Value::as_array) else {
            return report;
        };

        let count = slides.len();
        if count < self.config.min_slides {
            report.warning(
                "slide_count",
                format!(
                    "Only {count} slides (recommended: {}-{})",
                    self.config.min_slides, self.config.max_slides
                ),
            );
        }
        if count > self.config.max_slides {
            report.warning(
                "slide_count",
                format!("{count} slides (recommended: at most {})", self.config.max_slides),
            );
        }

        let mut registry = IdentityRegistry::new();
        let mut text_only = 0usize;
        for (index, slide) in slides.iter().enumerate() {
            if validate_slide(slide, index + 1, &mut registry, &mut report).text_only {
                text_only += 1;
            }
        }

        if count > 0 {
            let ratio = text_only as f64 / count as f64;
            if ratio > self.config.max_text_only_ratio {
                report.warning(
                    "text_only_ratio",
                    format!(
                        "Too many text-only slides ({text_only}/{count} = {:.0}%). Target: up to ~{:.0}%.",
                        ratio * 100.0,
                        self.config.max_text_only_ratio * 100.0
                    ),
                );
            }
        }

        debug!(
            slides = count,
            identifiers = registry.len(),
            text_only,
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "validated carousel document"
        );

        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
