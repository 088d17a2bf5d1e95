//! Content-type classification and routing of pipeline sources.

pub mod error;
pub mod mime;
pub mod partition;
pub mod router;

pub use error::RouterError;
pub use mime::MimeRegistry;
pub use partition::RoutePartition;
pub use router::{FileTypeRouter, UNCLASSIFIED};
