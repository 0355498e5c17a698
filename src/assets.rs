//! Asset references - what a document needs on disk
//!
//! Read-only over the document and tolerant of malformed shapes: the bundler
//! only calls it after validation, but nothing here assumes that.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::catalog::ElementType;

/// Distinct slide `backgroundImage` and image-element `src` paths under
/// `prefix`, sorted.
pub fn collect_asset_refs(document: &Value, prefix: &str) -> Vec<String> {
    let mut refs = BTreeSet::new();
    let slides = document
        .get("slides")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for slide in slides {
        push_ref(&mut refs, slide.get("backgroundImage"), prefix);

        let elements = slide
            .get("elements")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for element in elements {
            if element.get("type").and_then(Value::as_str) == Some(ElementType::Image.as_str()) {
                push_ref(&mut refs, element.get("src"), prefix);
            }
        }
    }

    refs.into_iter().collect()
}

fn push_ref(refs: &mut BTreeSet<String>, value: Option<&Value>, prefix: &str) {
    if let Some(path) = value.and_then(Value::as_str) {
        if !path.is_empty() && path.starts_with(prefix) {
            refs.insert(path.to_string());
        }
    }
}

/// MIME type the editor assigns to an imported asset.
pub fn mime_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_backgrounds_and_sources() {
        let doc = json!({
            "slides": [
                {"backgroundImage": "assets/bg.jpg", "elements": [
                    {"type": "image", "src": "assets/photo.png"},
                    {"type": "image", "src": "https://cdn.example.com/remote.png"},
                    {"type": "paragraph", "content": "x"}
                ]},
                {"backgroundImage": null, "elements": [
                    {"type": "image", "src": "assets/photo.png"},
                    {"type": "image", "src": ""}
                ]}
            ]
        });
        assert_eq!(
            collect_asset_refs(&doc, "assets/"),
            vec!["assets/bg.jpg".to_string(), "assets/photo.png".to_string()]
        );
    }

    #[test]
    fn test_ignores_src_on_non_image_elements() {
        let doc = json!({
            "slides": [{"elements": [
                {"type": "paragraph", "src": "assets/not-an-image.png"},
                {"src": "assets/untyped.png"},
                {"type": "image", "variant": "inline", "src": "assets/real.png"}
            ]}]
        });
        assert_eq!(collect_asset_refs(&doc, "assets/"), vec!["assets/real.png".to_string()]);
    }

    #[test]
    fn test_tolerates_malformed_documents() {
        assert!(collect_asset_refs(&json!({"slides": "x"}), "assets/").is_empty());
        assert!(collect_asset_refs(&json!({"slides": [1, {"elements": 3}]}), "assets/").is_empty());
        assert!(collect_asset_refs(&json!(null), "assets/").is_empty());
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_for_path("assets/a.JPG"), "image/jpeg");
        assert_eq!(mime_for_path("assets/icon.svg"), "image/svg+xml");
        assert_eq!(mime_for_path("assets/notes"), "application/octet-stream");
    }
}
