//! Property tests for determinism of validation output.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use carousel_core::catalog::REQUIRED_THEME_COLORS;
use carousel_core::validate;

fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        prop::sample::select(vec!["cover", "image", "heading", "assets/a.png", "<div>", ""])
            .prop_map(|s| json!(s)),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "id", "type", "layout", "elements", "src", "variant", "level", "content",
                ]),
                inner,
                0..6,
            )
            .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())),
        ]
    })
}

proptest! {
    /// Validation never panics and is idempotent on arbitrary slide payloads.
    #[test]
    fn validation_idempotent(slides in prop::collection::vec(arbitrary_json(), 0..14)) {
        let doc = json!({"version": 1, "slides": slides, "theme": {}, "canvas": {}});
        let first = validate(&doc);
        let second = validate(&doc);
        prop_assert_eq!(first, second);
    }

    /// Missing color roles come back sorted whatever subset is removed and
    /// whatever order the remaining keys were inserted in.
    #[test]
    fn missing_colors_reported_sorted(
        keep in prop::collection::vec(any::<bool>(), REQUIRED_THEME_COLORS.len()),
        order in Just(REQUIRED_THEME_COLORS.to_vec()).prop_shuffle(),
    ) {
        let mut colors = Map::new();
        for role in &order {
            let index = REQUIRED_THEME_COLORS.iter().position(|r| r == role).unwrap();
            if keep[index] {
                colors.insert(role.to_string(), json!("#000000"));
            }
        }
        let doc = json!({"version": 1, "slides": [], "canvas": {}, "theme": {"colors": colors, "typography": {
            "heading": {}, "paragraph": {}, "subtitle": {}, "tag": {}, "quote": {}
        }}});

        let mut expected: Vec<String> = REQUIRED_THEME_COLORS
            .iter()
            .zip(&keep)
            .filter(|(_, kept)| !**kept)
            .map(|(role, _)| format!("theme.colors is missing required color: {role}"))
            .collect();
        expected.sort();

        let report = validate(&doc);
        let errors: Vec<String> = report.errors().into_iter().map(str::to_string).collect();
        prop_assert_eq!(errors, expected);
    }
}
