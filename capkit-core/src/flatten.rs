//! Nested document → dotted-path namespace.
//!
//! ```rust
//! use capkit_core::flatten::flatten;
//! use serde_json::json;
//!
//! let doc = json!({"a": {"b": {"c": "v"}}});
//! let flat = flatten(doc.as_object().unwrap());
//!
//! assert_eq!(flat.len(), 1);
//! assert_eq!(flat["a.b.c"], json!("v"));
//! ```
//!
//! Only objects are descended into. Arrays and scalars are leaves.
//!
//! When two shapes produce the same path (`{"a.b": 1, "a": {"b": 2}}`) the
//! entry visited last wins. Object keys iterate in sorted order, so the
//! outcome is stable for a given document.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::errors::{CapkitError, CapkitResult};

/// Deepest object nesting the walker descends into.
pub const MAX_DEPTH: usize = 64;

pub type Flattened = BTreeMap<String, Value>;

/// Flatten a document. Subtrees nested past [`MAX_DEPTH`] are kept as a
/// single leaf holding their compact JSON text.
pub fn flatten(document: &Map<String, Value>) -> Flattened {
    let mut out = Flattened::new();
    // lenient walk never errors
    let _ = walk(document, "", 0, false, &mut out);
    out
}

/// Like [`flatten`], but fails instead of truncating an over-deep document.
pub fn try_flatten(document: &Map<String, Value>) -> CapkitResult<Flattened> {
    let mut out = Flattened::new();
    walk(document, "", 0, true, &mut out)?;
    Ok(out)
}

fn walk(
    node: &Map<String, Value>,
    prefix: &str,
    depth: usize,
    strict: bool,
    out: &mut Flattened,
) -> CapkitResult<()> {
    for (key, value) in node {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(child) if depth + 1 < MAX_DEPTH => {
                walk(child, &path, depth + 1, strict, out)?;
            }
            Value::Object(_) if strict => {
                return Err(CapkitError::too_deep(path, MAX_DEPTH));
            }
            Value::Object(_) => {
                out.insert(path, Value::String(value.to_string()));
            }
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
    Ok(())
}

/// Render a flattened leaf the way the store keeps it.
///
/// Strings are verbatim, null is empty, arrays are compact JSON. Parsed
/// numbers keep their source digits (`12.50`, 30-digit integers).
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn nested_paths_are_joined() {
        let flat = flatten(&obj(json!({"a": {"b": {"c": "v"}}})));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("a.b.c"), Some(&json!("v")));
        assert!(!flat.contains_key("a"));
        assert!(!flat.contains_key("a.b"));
    }

    #[test]
    fn empty_and_flat_documents() {
        assert!(flatten(&Map::new()).is_empty());

        let flat = flatten(&obj(json!({"x": 1, "y": "two"})));
        assert_eq!(flat.get("x"), Some(&json!(1)));
        assert_eq!(flat.get("y"), Some(&json!("two")));
    }

    #[test]
    fn arrays_are_opaque_leaves() {
        let flat = flatten(&obj(json!({"devices": {"list": [{"id": 1}, "b"]}})));
        assert_eq!(flat.get("devices.list"), Some(&json!([{"id": 1}, "b"])));
    }

    #[test]
    fn empty_nested_object_contributes_nothing() {
        let flat = flatten(&obj(json!({"a": {}, "b": 1})));
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("b"));
    }

    #[test]
    fn collision_is_last_write_wins() {
        // "a" sorts before "a.b", so the literal dotted key is written last
        let flat = flatten(&obj(json!({"a.b": 1, "a": {"b": 2}})));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("a.b"), Some(&json!(1)));
    }

    fn nested(depth: usize) -> Map<String, Value> {
        let mut v = json!("leaf");
        for _ in 0..depth {
            v = json!({ "n": v });
        }
        obj(v)
    }

    #[test]
    fn deep_documents_are_bounded() {
        let doc = nested(MAX_DEPTH + 5);

        let err = try_flatten(&doc).unwrap_err();
        assert!(matches!(err, CapkitError::TooDeep { max: MAX_DEPTH, .. }));

        let flat = flatten(&doc);
        assert_eq!(flat.len(), 1);
        let (_, leaf) = flat.iter().next().unwrap();
        assert!(leaf.is_string());

        assert!(try_flatten(&nested(MAX_DEPTH - 1)).is_ok());
    }

    #[test]
    fn text_rendering() {
        assert_eq!(to_text(&json!("db1")), "db1");
        assert_eq!(to_text(&json!(5432)), "5432");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&Value::Null), "");
        assert_eq!(to_text(&json!([1, 2])), "[1,2]");

        let parsed: Value = serde_json::from_str("[12.50, 123456789012345678901234567890]").unwrap();
        assert_eq!(to_text(&parsed[0]), "12.50");
        assert_eq!(to_text(&parsed[1]), "123456789012345678901234567890");
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z0-9]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}(\\.[a-z]{1,3})?", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn flatten_is_idempotent(
            doc in prop::collection::btree_map("[a-z]{1,3}", arb_value(), 0..5)
        ) {
            let doc: Map<String, Value> = doc.into_iter().collect();
            let once = flatten(&doc);
            let again: Map<String, Value> = once.clone().into_iter().collect();
            prop_assert_eq!(flatten(&again), once);
        }

        #[test]
        fn no_leaf_is_an_object(
            doc in prop::collection::btree_map("[a-z]{1,3}", arb_value(), 0..5)
        ) {
            let doc: Map<String, Value> = doc.into_iter().collect();
            for value in flatten(&doc).values() {
                prop_assert!(!value.is_object());
            }
        }
    }
}
