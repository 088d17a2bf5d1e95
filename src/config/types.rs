use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouterConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<String>,
    /// Extra `mime -> extension` associations, e.g. `"application/x-ndjson" = ".ndjson"`.
    /// Applied in key order, so for a shared extension the last mime type wins.
    #[serde(default)]
    pub additional_mime_types: BTreeMap<String, String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            additional_mime_types: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConverterConfig {
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub store_full_path: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            store_full_path: false,
        }
    }
}

pub(crate) fn default_rules() -> Vec<String> {
    ["text/plain", "text/markdown", "application/pdf"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_encoding() -> String {
    "utf-8".into()
}
