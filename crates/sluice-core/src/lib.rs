//! Shared data contract for sluice components: byte streams, sources, metadata, documents.

pub mod byte_stream;
pub mod document;
pub mod encoding;
pub mod error;
pub mod meta;
pub mod source;

pub use byte_stream::ByteStream;
pub use document::Document;
pub use encoding::Encoding;
pub use error::CoreError;
pub use meta::{Meta, MetaArg, normalize_metadata};
pub use source::{FILE_PATH_KEY, Source};
