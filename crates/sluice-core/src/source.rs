use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::byte_stream::ByteStream;
use crate::error::CoreError;

/// Metadata key holding the originating path of a promoted source.
pub const FILE_PATH_KEY: &str = "file_path";

/// A pipeline input: a file on disk or an in-memory stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Path(PathBuf),
    Stream(ByteStream),
}

impl Source {
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Stream(_) => None,
        }
    }

    #[must_use]
    pub fn as_stream(&self) -> Option<&ByteStream> {
        match self {
            Self::Path(_) => None,
            Self::Stream(stream) => Some(stream),
        }
    }

    /// Materialize this source as a [`ByteStream`].
    ///
    /// Paths are read in full and tagged with a `file_path` metadata entry.
    /// Streams are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if a path cannot be read.
    pub fn into_byte_stream(self) -> Result<ByteStream, CoreError> {
        match self {
            Self::Stream(stream) => Ok(stream),
            Self::Path(path) => {
                let mut stream = ByteStream::from_file_path(&path, None, None)?;
                stream.meta_mut().insert(
                    FILE_PATH_KEY.to_owned(),
                    Value::String(path.display().to_string()),
                );
                Ok(stream)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Stream(stream) => match stream.meta().get(FILE_PATH_KEY).and_then(Value::as_str) {
                Some(path) => write!(f, "ByteStream({path})"),
                None => write!(f, "ByteStream({} bytes)", stream.len()),
            },
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<ByteStream> for Source {
    fn from(stream: ByteStream) -> Self {
        Self::Stream(stream)
    }
}
