use serde_json::Value;

use super::{display_value, is_truthy, validate_element, IdentityRegistry, Registration, ValidationReport};
use crate::catalog::Layout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideOutcome {
    /// No image element, no background image, and not a cover/cta slide.
    pub text_only: bool,
}

/// Checks slide number `position` (1-based) and every element inside it.
pub fn validate_slide(
    slide: &Value,
    position: usize,
    registry: &mut IdentityRegistry,
    report: &mut ValidationReport,
) -> SlideOutcome {
    let Some(obj) = slide.as_object() else {
        report.error("slide", format!("Slide {position}: expected an object"));
        return SlideOutcome::default();
    };

    let layout = obj.get("layout").and_then(Value::as_str).and_then(Layout::parse);
    if layout.is_none() {
        report.error(
            "layout",
            format!("Slide {position}: invalid layout '{}'", display_value(obj.get("layout"))),
        );
    }

    match registry.register(obj.get("id")) {
        Registration::Registered => {}
        Registration::Missing => report.error("slide_id", format!("Slide {position}: missing 'id'")),
        Registration::Duplicate(id) => {
            report.error("slide_id", format!("Slide {position}: duplicate id '{id}'"))
        }
    }

    let Some(elements) = obj.get("elements").and_then(Value::as_array) else {
        report.error("elements", format!("Slide {position}: 'elements' must be an array"));
        return SlideOutcome::default();
    };

    let mut has_image = false;
    for (index, element) in elements.iter().enumerate() {
        let outcome = validate_element(element, position, index + 1, registry, report);
        has_image |= outcome.is_image;
    }
    let has_background = is_truthy(obj.get("backgroundImage"));
    let exempt = layout.is_some_and(Layout::exempt_from_text_only);

    SlideOutcome {
        text_only: !has_image && !has_background && !exempt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(slide: Value) -> (ValidationReport, SlideOutcome) {
        let mut registry = IdentityRegistry::new();
        let mut report = ValidationReport::new();
        let outcome = validate_slide(&slide, 3, &mut registry, &mut report);
        (report, outcome)
    }

    #[test]
    fn test_text_only_classification() {
        let (_, plain) = check(json!({
            "id": "s", "layout": "title-body",
            "elements": [{"id": "h", "type": "heading", "level": 1, "content": "x"}]
        }));
        assert!(plain.text_only);

        let (_, with_bg) = check(json!({
            "id": "s", "layout": "title-body", "backgroundImage": "assets/bg.jpg", "elements": []
        }));
        assert!(!with_bg.text_only);

        let (_, with_image) = check(json!({
            "id": "s", "layout": "image-top",
            "elements": [{"id": "i", "type": "image", "variant": "area", "src": "assets/a.png"}]
        }));
        assert!(!with_image.text_only);

        let (_, cover) = check(json!({"id": "s", "layout": "cover", "elements": []}));
        assert!(!cover.text_only);

        let (_, cta) = check(json!({"id": "s", "layout": "cta", "elements": []}));
        assert!(!cta.text_only);
    }

    #[test]
    fn test_empty_background_does_not_count() {
        let (_, outcome) = check(json!({
            "id": "s", "layout": "list", "backgroundImage": "", "elements": []
        }));
        assert!(outcome.text_only);
    }

    #[test]
    fn test_invalid_layout_and_missing_id() {
        let (report, _) = check(json!({"layout": "stats", "elements": []}));
        assert_eq!(
            report.errors(),
            vec!["Slide 3: invalid layout 'stats'", "Slide 3: missing 'id'"]
        );
    }

    #[test]
    fn test_elements_not_array_skips_elements() {
        let (report, outcome) = check(json!({"id": "s", "layout": "list", "elements": {"id": "x"}}));
        assert_eq!(report.errors(), vec!["Slide 3: 'elements' must be an array"]);
        assert!(!outcome.text_only);
    }

    #[test]
    fn test_slide_and_element_share_namespace() {
        let (report, _) = check(json!({
            "id": "dup", "layout": "list",
            "elements": [{"id": "dup", "type": "divider"}]
        }));
        assert_eq!(report.errors(), vec!["Slide 3: duplicate id 'dup'"]);
    }
}
