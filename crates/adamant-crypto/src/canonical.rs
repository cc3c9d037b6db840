//! Canonical JSON encoding.
//!
//! Fingerprints across the core are computed over this exact form: object
//! keys sorted lexicographically, compact `,`/`:` separators, UTF-8, absent
//! optionals encoded as `null`. Two semantically identical values always
//! produce identical bytes, independent of struct field order or the JSON
//! library's map implementation.

use serde::Serialize;
use serde_json::Value;

use adamant_core::AdamantError;

/// Encode any serializable value to its canonical JSON string.
pub fn canonical_string<T: Serialize>(value: &T) -> Result<String, AdamantError> {
    let tree = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&tree, &mut out);
    Ok(out)
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, inner)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display on Value::String produces a correctly escaped
                // JSON string literal.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(inner, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_separators_compact() {
        let v = json!({"b": 1, "a": {"z": true, "m": null}});
        let s = canonical_string(&v).unwrap();
        assert_eq!(s, r#"{"a":{"m":null,"z":true},"b":1}"#);
    }

    #[test]
    fn arrays_preserve_order() {
        let v = json!({"list": [3, 1, 2]});
        assert_eq!(canonical_string(&v).unwrap(), r#"{"list":[3,1,2]}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"k": "a\"b\\c"});
        assert_eq!(canonical_string(&v).unwrap(), r#"{"k":"a\"b\\c"}"#);
    }

    #[test]
    fn struct_field_order_does_not_matter() {
        #[derive(Serialize)]
        struct A {
            x: u32,
            y: &'static str,
        }
        #[derive(Serialize)]
        struct B {
            y: &'static str,
            x: u32,
        }
        let a = canonical_string(&A { x: 7, y: "v" }).unwrap();
        let b = canonical_string(&B { y: "v", x: 7 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_map_is_an_empty_object() {
        let v = json!({"extra": {}});
        assert_eq!(canonical_string(&v).unwrap(), r#"{"extra":{}}"#);
    }
}
