use std::collections::HashMap;

use sluice_core::Source;

/// Sources grouped by the rule they matched, or by `"unclassified"`.
///
/// Only buckets that received at least one source are present. Within a
/// bucket, sources keep their input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePartition {
    buckets: HashMap<String, Vec<Source>>,
}

impl RoutePartition {
    pub(crate) fn push(&mut self, bucket: &str, source: Source) {
        self.buckets
            .entry(bucket.to_owned())
            .or_default()
            .push(source);
    }

    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<&[Source]> {
        self.buckets.get(bucket).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    #[must_use]
    pub fn unclassified(&self) -> Option<&[Source]> {
        self.get(crate::UNCLASSIFIED)
    }

    /// Number of non-empty buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of routed sources across all buckets.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Source])> {
        self.buckets
            .iter()
            .map(|(name, sources)| (name.as_str(), sources.as_slice()))
    }

    pub fn remove(&mut self, bucket: &str) -> Option<Vec<Source>> {
        self.buckets.remove(bucket)
    }

    #[must_use]
    pub fn into_inner(self) -> HashMap<String, Vec<Source>> {
        self.buckets
    }
}

impl IntoIterator for RoutePartition {
    type Item = (String, Vec<Source>);
    type IntoIter = std::collections::hash_map::IntoIter<String, Vec<Source>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}
