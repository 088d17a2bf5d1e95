use serde_json::{Value, json};
use sluice_core::Source;
use sluice_router::{FileTypeRouter, RoutePartition};

/// Render a source for JSON output: paths as strings, streams as a summary object.
pub fn source_to_json(source: &Source) -> Value {
    match source {
        Source::Path(path) => Value::String(path.display().to_string()),
        Source::Stream(stream) => json!({
            "content_type": stream.content_type(),
            "size": stream.len(),
            "meta": stream.meta(),
        }),
    }
}

/// Render the non-empty buckets of a partition as a JSON object keyed by channel.
pub fn partition_to_json(router: &FileTypeRouter, partition: &RoutePartition) -> Value {
    let mut out = serde_json::Map::new();
    for channel in router.channels() {
        if let Some(sources) = partition.get(channel) {
            out.insert(
                channel.to_owned(),
                sources.iter().map(source_to_json).collect(),
            );
        }
    }
    Value::Object(out)
}
