// Stage pipeline core - chunk transforms chained over a content stream

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::error::Result;
use crate::stream::ContentStream;

/// A pure chunk-to-chunk transform.
///
/// A stage may hold back the tail of a chunk it cannot decide on yet and emit
/// it with a later chunk, or from `finish` once the input is exhausted.
pub trait ChunkStage: Send {
    fn name(&self) -> String;

    /// Transform one input chunk; an empty output is allowed
    fn transform(&mut self, chunk: Bytes) -> Result<Bytes>;

    /// Flush whatever is still held back at end of input
    fn finish(&mut self) -> Result<Bytes>;
}

struct StageState {
    upstream: ContentStream,
    stage: Box<dyn ChunkStage>,
    done: bool,
}

/// Wrap `upstream` so every chunk pulled from it passes through `stage`.
///
/// Nothing is read until the returned stream is polled. The first error,
/// from upstream or from the stage, is yielded and ends the stream.
pub fn attach(upstream: ContentStream, stage: Box<dyn ChunkStage>) -> ContentStream {
    let state = StageState {
        upstream,
        stage,
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }
            match state.upstream.next().await {
                Some(Ok(chunk)) => match state.stage.transform(chunk) {
                    Ok(out) if out.is_empty() => continue,
                    Ok(out) => return Some((Ok(out), state)),
                    Err(e) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                },
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.done = true;
                    return match state.stage.finish() {
                        Ok(out) if out.is_empty() => None,
                        Ok(out) => Some((Ok(out), state)),
                        Err(e) => Some((Err(e), state)),
                    };
                }
            }
        }
    }))
}

/// Pipeline - an ordered chain of stages
pub struct StagePipeline {
    name: String,
    stages: Vec<Box<dyn ChunkStage>>,
}

impl StagePipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn add_stage(mut self, stage: Box<dyn ChunkStage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Connect the stages over `upstream`, first stage closest to the source
    pub fn attach(self, upstream: ContentStream) -> ContentStream {
        debug!("Attaching pipeline '{}' with {} stage(s)", self.name, self.stages.len());
        self.stages.into_iter().fold(upstream, |stream, stage| {
            debug!("  stage: {}", stage.name());
            attach(stream, stage)
        })
    }
}
