use std::collections::HashSet;

use serde_json::Value;

use super::{display_value, is_truthy};

/// Identifiers seen so far in one validation pass.
///
/// Slides and elements share a single flat namespace. A registry lives for
/// exactly one `Validator::validate` call and is never shared between calls.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    seen: HashSet<IdKey>,
}

/// Identity of an id value. Strings and numbers never collide; numbers
/// compare by value, so `1` and `1.0` are the same id and `true` equals `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IdKey {
    Text(String),
    Number(u64),
    Json(String),
}

impl IdKey {
    fn of(id: &Value) -> Self {
        match id {
            Value::String(s) => IdKey::Text(s.clone()),
            Value::Bool(b) => IdKey::Number(f64::from(u8::from(*b)).to_bits()),
            Value::Number(n) => match n.as_f64() {
                Some(f) => IdKey::Number(f.to_bits()),
                None => IdKey::Json(n.to_string()),
            },
            other => IdKey::Json(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered,
    Missing,
    Duplicate(String),
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` unless it is missing or already taken. First seen wins.
    pub fn register(&mut self, id: Option<&Value>) -> Registration {
        let Some(id) = id.filter(|v| is_truthy(Some(*v))) else {
            return Registration::Missing;
        };
        if self.seen.insert(IdKey::of(id)) {
            Registration::Registered
        } else {
            Registration::Duplicate(display_value(Some(id)))
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_seen_wins() {
        let mut registry = IdentityRegistry::new();
        assert_eq!(registry.register(Some(&json!("s1"))), Registration::Registered);
        assert_eq!(
            registry.register(Some(&json!("s1"))),
            Registration::Duplicate("s1".to_string())
        );
        assert_eq!(
            registry.register(Some(&json!("s1"))),
            Registration::Duplicate("s1".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_numeric_ids_compare_by_value() {
        let mut registry = IdentityRegistry::new();
        assert_eq!(registry.register(Some(&json!(1))), Registration::Registered);
        assert_eq!(registry.register(Some(&json!("1"))), Registration::Registered);
        assert_eq!(
            registry.register(Some(&json!(1.0))),
            Registration::Duplicate("1.0".to_string())
        );
        assert_eq!(
            registry.register(Some(&json!(true))),
            Registration::Duplicate("true".to_string())
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_ids_are_not_registered() {
        let mut registry = IdentityRegistry::new();
        assert_eq!(registry.register(None), Registration::Missing);
        assert_eq!(registry.register(Some(&json!(""))), Registration::Missing);
        assert_eq!(registry.register(Some(&json!(null))), Registration::Missing);
        assert!(registry.is_empty());
    }
}
