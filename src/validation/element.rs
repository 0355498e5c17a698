use serde_json::Value;

use super::{display_value, is_truthy, IdentityRegistry, Registration, ValidationReport};
use crate::catalog::{
    contains_forbidden_markup, is_valid_font, ElementType, ImageVariant, HEADING_LEVELS,
};

/// What a slide needs to know about an element after it was checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementOutcome {
    pub is_image: bool,
}

/// Checks one element of slide `slide` (1-based). `index` is the 1-based
/// position inside the slide and is only used when the element is not an object.
pub fn validate_element(
    element: &Value,
    slide: usize,
    index: usize,
    registry: &mut IdentityRegistry,
    report: &mut ValidationReport,
) -> ElementOutcome {
    let Some(el) = element.as_object() else {
        report.error("element", format!("Slide {slide}: element {index} is not an object"));
        return ElementOutcome::default();
    };

    match registry.register(el.get("id")) {
        Registration::Registered => {}
        Registration::Missing => {
            report.error("element_id", format!("Slide {slide}: element without 'id'"));
        }
        Registration::Duplicate(id) => {
            report.error("element_id", format!("Slide {slide}: duplicate id '{id}'"));
        }
    }

    let label = if is_truthy(el.get("id")) {
        format!("Slide {slide} ({})", display_value(el.get("id")))
    } else {
        format!("Slide {slide} (?)")
    };

    let kind = el.get("type").and_then(Value::as_str).and_then(ElementType::parse);
    if kind.is_none() {
        report.error(
            "element_type",
            format!("{label}: invalid element type '{}'", display_value(el.get("type"))),
        );
    }

    if let Some(content) = el.get("content").and_then(Value::as_str) {
        if contains_forbidden_markup(content) {
            report.error(
                "content_markup",
                format!("{label}: forbidden HTML in content (div/p/h1-h6/style/script/link)"),
            );
        }
    }

    match kind {
        Some(ElementType::Heading) => {
            let level_ok = el
                .get("level")
                .and_then(Value::as_f64)
                .is_some_and(|level| HEADING_LEVELS.iter().any(|&h| f64::from(h) == level));
            if !level_ok {
                report.error("heading_level", format!("{label}: heading.level must be 1, 2 or 3"));
            }
        }
        Some(ElementType::Image) => {
            let variant = el.get("variant").and_then(Value::as_str).and_then(ImageVariant::parse);
            if variant.is_none() {
                report.error(
                    "image_variant",
                    format!(
                        "{label}: invalid image.variant '{}' (expected area, background or inline)",
                        display_value(el.get("variant"))
                    ),
                );
            }
            if !is_truthy(el.get("src")) {
                report.warning("image_src", format!("{label}: image without src"));
            }
        }
        Some(ElementType::Spacer) => {
            if !el.get("height").is_some_and(Value::is_number) {
                report.error("spacer_height", format!("{label}: spacer requires a numeric height"));
            }
        }
        _ => {}
    }

    if is_truthy(el.get("fontFamily")) {
        let family = el.get("fontFamily");
        if !family.and_then(Value::as_str).is_some_and(is_valid_font) {
            report.warning(
                "font_family",
                format!("{label}: fontFamily '{}' is not in the valid font list", display_value(family)),
            );
        }
    }

    ElementOutcome {
        is_image: kind == Some(ElementType::Image),
    }
}
