use sluice_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("the list of mime types cannot be empty")]
    EmptyRules,

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}
