use serde_json::Value;

use crate::error::CoreError;

/// Free-form metadata attached to streams and documents.
pub type Meta = serde_json::Map<String, Value>;

/// Caller-supplied metadata for a batch of sources.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaArg {
    #[default]
    None,
    /// One mapping applied to every source.
    Shared(Meta),
    /// One mapping per source, zipped by position.
    PerSource(Vec<Meta>),
}

impl MetaArg {
    /// Interpret a JSON value: `null`, an object, or an array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedMeta`] for any other shape.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Null => Ok(Self::None),
            Value::Object(map) => Ok(Self::Shared(map)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(CoreError::UnsupportedMeta(format!(
                        "entry {i} is {}, expected an object",
                        json_kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::PerSource),
            other => Err(CoreError::UnsupportedMeta(format!(
                "{}, expected an object or a list of objects",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Meta> for MetaArg {
    fn from(meta: Meta) -> Self {
        Self::Shared(meta)
    }
}

impl From<Vec<Meta>> for MetaArg {
    fn from(metas: Vec<Meta>) -> Self {
        Self::PerSource(metas)
    }
}

impl From<Option<Meta>> for MetaArg {
    fn from(meta: Option<Meta>) -> Self {
        meta.map_or(Self::None, Self::Shared)
    }
}

/// Expand `meta` into exactly one mapping per source.
///
/// # Errors
///
/// Returns [`CoreError::MetaLength`] when a per-source list does not have `count` entries.
pub fn normalize_metadata(meta: MetaArg, count: usize) -> Result<Vec<Meta>, CoreError> {
    match meta {
        MetaArg::None => Ok(vec![Meta::new(); count]),
        MetaArg::Shared(map) => Ok(vec![map; count]),
        MetaArg::PerSource(list) if list.len() == count => Ok(list),
        MetaArg::PerSource(list) => Err(CoreError::MetaLength {
            expected: count,
            actual: list.len(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
