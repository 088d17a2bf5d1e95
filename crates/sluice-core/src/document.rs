use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meta::Meta;

/// Text content produced by a converter, with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub meta: Meta,
}

impl Document {
    /// Build a document whose id is derived from its content and metadata.
    #[must_use]
    pub fn new(content: impl Into<String>, meta: Meta) -> Self {
        let content = content.into();
        let id = content_id(&content, &meta);
        Self { id, content, meta }
    }
}

fn content_id(content: &str, meta: &Meta) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(content.as_bytes());
    hasher.update(&[0]);
    hasher.update(Value::Object(meta.clone()).to_string().as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Meta {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn id_is_stable() {
        let a = Document::new("hello", obj(json!({"k": 1})));
        let b = Document::new("hello", obj(json!({"k": 1})));
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 64);
    }

    #[test]
    fn id_depends_on_meta() {
        let a = Document::new("hello", obj(json!({"k": 1})));
        let b = Document::new("hello", obj(json!({"k": 2})));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_to_json() {
        let doc = Document::new("body", obj(json!({"file_path": "a.txt"})));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"], "body");
        assert_eq!(value["meta"]["file_path"], "a.txt");
    }
}
