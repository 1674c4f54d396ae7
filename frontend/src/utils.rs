//! Utility helpers shared by the slices.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UtilError {
    /// A required argument was missing: a programming error, not a runtime
    /// condition.
    #[error("{0} is required")]
    Required(&'static str),
}

/// `a / b`, or `None` when `b` is zero.
pub fn div_ab(a: f64, b: f64) -> Option<f64> {
    if b == 0.0 {
        None
    } else {
        Some(a / b)
    }
}

/// Neither missing nor JSON `null`.
pub fn is_defined(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// Look up a dotted property path (`"meta.id"`) inside `value`.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Object key for a JSON scalar, the way JS stringifies property keys.
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Property-key form of a JSON number: integral floats drop their fraction
/// (`1.0` → `"1"`), other values keep their shortest decimal form.
pub fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Index `items` by the value found at `key_property_path`.  Items without
/// that property are skipped; later items win on duplicate keys.
///
/// ```
/// use serde_json::json;
/// use todos_frontend::utils::array_to_object;
///
/// let items = [json!({ "id": 1, "name": "John" }), json!({ "id": 2, "name": "Doe" })];
/// let by_id = array_to_object(&items, "id");
/// assert_eq!(by_id["2"]["name"], "Doe");
/// ```
pub fn array_to_object(items: &[Value], key_property_path: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for item in items {
        if let Some(key) = get_path(item, key_property_path).and_then(key_of) {
            out.insert(key, item.clone());
        }
    }
    out
}

/// Make `target` hold exactly the keys of `source`, updating it in place.
/// Meant for reducers that replace a whole slice object.
pub fn set_immutable_object(target: &mut Value, source: &Value) -> Result<(), UtilError> {
    let target = match target {
        Value::Object(map) => map,
        _ => return Err(UtilError::Required("oldObject")),
    };
    let empty = Map::new();
    let source = source.as_object().unwrap_or(&empty);

    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
    target.retain(|key, _| source.contains_key(key));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn divides_two_positive_numbers() {
        assert_eq!(div_ab(6.0, 2.0), Some(3.0));
    }

    #[test]
    fn divides_two_negative_numbers() {
        assert_eq!(div_ab(-8.0, -4.0), Some(2.0));
    }

    #[test]
    fn division_by_zero_is_none() {
        assert_eq!(div_ab(1.0, 0.0), None);
    }

    #[test]
    fn number_keys_follow_property_key_form() {
        let key = |v: Value| key_of(&v).unwrap();
        assert_eq!(key(json!(7)), "7");
        assert_eq!(key(json!(1.0)), "1");
        assert_eq!(key(json!(1.5)), "1.5");
        assert_eq!(key(json!(-0.0)), "0");
    }

    #[test]
    fn is_defined_rejects_null_and_missing() {
        assert!(!is_defined(None));
        assert!(!is_defined(Some(&Value::Null)));
        assert!(is_defined(Some(&json!(42))));
    }

    #[test]
    fn array_to_object_supports_nested_paths_and_skips_missing_keys() {
        let items = [
            json!({ "meta": { "id": "a" }, "v": 1 }),
            json!({ "meta": {}, "v": 2 }),
            json!({ "meta": { "id": 7 }, "v": 3 }),
        ];
        let out = array_to_object(&items, "meta.id");
        assert_eq!(out.len(), 2);
        assert_eq!(out["a"]["v"], 1);
        assert_eq!(out["7"]["v"], 3);
    }

    #[test]
    fn set_immutable_object_replaces_keys_in_place() {
        let mut target = json!({ "keep": 1, "drop": 2 });
        set_immutable_object(&mut target, &json!({ "keep": 10, "add": 3 })).unwrap();
        assert_eq!(target, json!({ "keep": 10, "add": 3 }));
    }

    #[test]
    fn set_immutable_object_requires_a_target_object() {
        let mut missing = Value::Null;
        assert_eq!(
            set_immutable_object(&mut missing, &json!({})),
            Err(UtilError::Required("oldObject"))
        );
    }
}
