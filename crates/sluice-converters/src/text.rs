use std::path::Path;

use serde_json::Value;
use sluice_core::{Document, Encoding, FILE_PATH_KEY, Meta, MetaArg, Source, normalize_metadata};

use crate::{ConvertError, DocumentConverter};

/// Metadata key that overrides the decoding for a single stream.
pub const ENCODING_KEY: &str = "encoding";

/// Decodes plain-text sources into documents.
#[derive(Debug, Clone, Default)]
pub struct TextFileToDocument {
    pub encoding: Encoding,
    /// Keep the full `file_path` in document metadata instead of just the file name.
    pub store_full_path: bool,
}

impl TextFileToDocument {
    #[must_use]
    pub fn new(encoding: Encoding, store_full_path: bool) -> Self {
        Self {
            encoding,
            store_full_path,
        }
    }

    fn encoding_for(&self, meta: &Meta) -> Encoding {
        let Some(label) = meta.get(ENCODING_KEY).and_then(Value::as_str) else {
            return self.encoding;
        };
        label.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}, falling back to {}", self.encoding);
            self.encoding
        })
    }
}

impl DocumentConverter for TextFileToDocument {
    fn convert(&self, sources: Vec<Source>, meta: MetaArg) -> Result<Vec<Document>, ConvertError> {
        let metas = normalize_metadata(meta, sources.len())?;
        let mut documents = Vec::with_capacity(sources.len());

        for (source, extra) in sources.into_iter().zip(metas) {
            let label = source.to_string();
            let stream = match source.into_byte_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("could not read {label}, skipping: {e}");
                    continue;
                }
            };

            let encoding = self.encoding_for(stream.meta());
            let content = match stream.to_string(encoding) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("could not convert {label} to text, skipping: {e}");
                    continue;
                }
            };

            let mut meta = stream.meta().clone();
            meta.extend(extra);
            if !self.store_full_path {
                strip_to_file_name(&mut meta);
            }
            documents.push(Document::new(content, meta));
        }

        Ok(documents)
    }

    fn content_type_rules(&self) -> &[&str] {
        &["text/.*"]
    }
}

fn strip_to_file_name(meta: &mut Meta) {
    let Some(Value::String(path)) = meta.get_mut(FILE_PATH_KEY) else {
        return;
    };
    if let Some(name) = Path::new(path.as_str()).file_name().and_then(|n| n.to_str()) {
        *path = name.to_owned();
    }
}
