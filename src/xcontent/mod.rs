//! Structured document ("XContent") rendering.
//!
//! # Data Flow
//! ```text
//! domain value (ClusterState, Decision, ...)
//!     → to_xcontent() builds an ordered serde_json::Value tree
//!     → to_string() writes compact or pretty JSON bytes
//! ```
//!
//! # Design Decisions
//! - Documents are plain `serde_json::Value` trees with insertion order
//!   preserved, so field order is part of the output contract
//! - Rendering options travel as an explicit `Params` map, never globals
//! - Writing a tree is infallible; only parameter parsing can fail

pub mod params;

pub use params::{ParamError, Params};

use serde_json::{Map, Value};

/// Ordered JSON object used while building documents.
pub type Object = Map<String, Value>;

/// Types that render themselves as a structured document fragment.
pub trait ToXContent {
    fn to_xcontent(&self) -> Value;
}

impl<T: ToXContent> ToXContent for [T] {
    fn to_xcontent(&self) -> Value {
        Value::Array(self.iter().map(ToXContent::to_xcontent).collect())
    }
}

/// Write a document as JSON text.
///
/// Pretty output uses two-space indentation; compact output carries no
/// insignificant whitespace.
pub fn to_string(document: &Value, pretty: bool) -> String {
    if pretty {
        format!("{:#}", document)
    } else {
        document.to_string()
    }
}

/// Parse a JSON document and write it back compactly.
///
/// Key order is kept as found in the input, so a rendered document survives
/// the round trip byte for byte.
pub fn normalize(json: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(value.to_string())
}

/// Build a JSON object from `(key, value)` pairs, keeping their order.
pub fn object<I, K>(fields: I) -> Value
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

/// An empty JSON object.
pub fn empty_object() -> Value {
    Value::Object(Object::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_keeps_insertion_order() {
        let doc = object([("zeta", json!(1)), ("alpha", json!(2))]);
        assert_eq!(to_string(&doc, false), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_pretty_and_compact_parse_to_same_tree() {
        let doc = object([("a", json!([1, 2])), ("b", empty_object())]);
        let pretty = to_string(&doc, true);
        assert!(pretty.contains('\n'));
        assert_eq!(normalize(&pretty).unwrap(), to_string(&doc, false));
    }
}
