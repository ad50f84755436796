//! Resource content streams

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::error::{ReplacerError, Result};

/// Readable content of a resource, pulled chunk by chunk
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A stream that yields nothing
pub fn empty() -> ContentStream {
    Box::pin(stream::empty())
}

/// A stream yielding the whole content as one chunk
pub fn from_bytes(content: impl Into<Bytes>) -> ContentStream {
    let content = content.into();
    if content.is_empty() {
        return empty();
    }
    Box::pin(stream::once(async move { Ok(content) }))
}

/// A stream yielding the given chunks in order
pub fn from_chunks<I>(chunks: I) -> ContentStream
where
    I: IntoIterator<Item = Bytes>,
    I::IntoIter: Send + 'static,
{
    Box::pin(stream::iter(chunks.into_iter().map(Ok)))
}

/// Split content into chunks of at most `chunk_size` bytes
pub fn chunked(content: Bytes, chunk_size: usize) -> ContentStream {
    if chunk_size == 0 || content.len() <= chunk_size {
        return from_bytes(content);
    }

    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(chunk_size)
        .map(|start| content.slice(start..(start + chunk_size).min(content.len())))
        .collect();
    from_chunks(chunks)
}

/// Drain a stream into a single buffer, stopping at the first error
pub async fn collect_bytes(mut stream: ContentStream) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

/// Drain a stream and decode it as UTF-8
pub async fn collect_string(stream: ContentStream) -> Result<String> {
    let bytes = collect_bytes(stream).await?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ReplacerError::encoding(e.utf8_error().valid_up_to(), e.to_string()))
}
