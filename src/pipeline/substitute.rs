// Stream substitution engine

use tracing::debug;

use super::core::StagePipeline;
use super::stages::{ReplaceStage, Utf8Stage};
use crate::placeholder::PlaceholderTable;
use crate::stream::ContentStream;
use crate::workspace::Resource;

/// Rebind every resource's content to a stream with the table applied.
///
/// Only the wiring happens here; bytes are transformed as the returned
/// resources' streams are consumed. Errors raised while consuming (invalid
/// UTF-8, read failures) reach the consumer through the stream.
pub fn apply_substitutions(resources: Vec<Resource>, table: &PlaceholderTable) -> Vec<Resource> {
    resources
        .into_iter()
        .map(|mut resource| {
            debug!("Substituting placeholders in {}", resource.path());
            let stream = resource.take_stream();
            resource.set_stream(substitute_stream(stream, table));
            resource
        })
        .collect()
}

/// Decode as UTF-8, then one replace stage per entry in table order
fn substitute_stream(stream: ContentStream, table: &PlaceholderTable) -> ContentStream {
    table
        .iter()
        .fold(
            StagePipeline::new("substitute").add_stage(Box::new(Utf8Stage::new())),
            |pipeline, entry| {
                pipeline.add_stage(Box::new(ReplaceStage::new(&entry.placeholder, &entry.value)))
            },
        )
        .attach(stream)
}
