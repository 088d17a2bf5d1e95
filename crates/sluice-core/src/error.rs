use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("cannot encode {ch:?} as {encoding}")]
    Encode { encoding: &'static str, ch: char },

    #[error("cannot decode bytes as {encoding}: {reason}")]
    Decode {
        encoding: &'static str,
        reason: String,
    },

    #[error("metadata list has {actual} entries, expected one per source ({expected})")]
    MetaLength { expected: usize, actual: usize },

    #[error("unsupported metadata shape: {0}")]
    UnsupportedMeta(String),
}
