//! Converters from pipeline sources to documents.

pub mod error;
pub mod text;

pub use error::ConvertError;
pub use text::TextFileToDocument;

use sluice_core::{Document, MetaArg, Source};

/// Turns a batch of sources into documents.
pub trait DocumentConverter {
    /// Convert `sources`, merging `meta` into each document's metadata.
    ///
    /// Sources that cannot be read or decoded are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `meta` does not fit the batch.
    fn convert(&self, sources: Vec<Source>, meta: MetaArg) -> Result<Vec<Document>, ConvertError>;

    /// Content-type rules this converter accepts, in router rule syntax.
    fn content_type_rules(&self) -> &[&str];
}
