use std::fmt;
use std::path::Path;

use crate::encoding::Encoding;
use crate::error::CoreError;
use crate::meta::Meta;

/// Number of payload bytes shown by the `Debug` representation.
pub const PREVIEW_LEN: usize = 100;

/// Binary payload with metadata and an optional declared content type.
///
/// The payload is fixed at construction; metadata can be merged later. Content
/// type is never re-inferred once set.
#[derive(Clone, PartialEq, Default)]
pub struct ByteStream {
    data: Vec<u8>,
    meta: Meta,
    content_type: Option<String>,
}

impl ByteStream {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            meta: Meta::new(),
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read the entire file at `path` into memory.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be opened or read.
    pub fn from_file_path(
        path: impl AsRef<Path>,
        content_type: Option<String>,
        meta: Option<Meta>,
    ) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            data,
            meta: meta.unwrap_or_default(),
            content_type,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Encode`] if `text` contains a character `encoding` cannot represent.
    pub fn from_string(
        text: &str,
        encoding: Encoding,
        content_type: Option<String>,
        meta: Option<Meta>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            data: encoding.encode(text)?,
            meta: meta.unwrap_or_default(),
            content_type,
        })
    }

    /// Write the payload to `path`, creating or truncating it.
    ///
    /// Metadata and content type are not written.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        std::fs::write(path, &self.data).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] if the payload is not valid `encoding`.
    pub fn to_string(&self, encoding: Encoding) -> Result<String, CoreError> {
        encoding.decode(&self.data)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] if the payload is not valid UTF-8.
    pub fn to_utf8_string(&self) -> Result<String, CoreError> {
        self.to_string(Encoding::Utf8)
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Merge `meta` into the stream's metadata; incoming keys win.
    pub fn merge_meta(&mut self, meta: Meta) {
        self.meta.extend(meta);
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = &self.data[..self.data.len().min(PREVIEW_LEN)];
        f.write_str("ByteStream(data=b\"")?;
        for &byte in preview {
            write!(f, "{}", std::ascii::escape_default(byte))?;
        }
        if self.data.len() > PREVIEW_LEN {
            f.write_str("...")?;
        }
        write!(
            f,
            "\", meta={}, content_type={:?})",
            serde_json::Value::Object(self.meta.clone()),
            self.content_type
        )
    }
}
