//! Host workspace contract and the adapters shipped with the crate
//!
//! The host build owns the resources; the task only resolves them by glob,
//! rebinds their content streams and hands them back for writing.

pub mod fs;
pub mod glob;
pub mod memory;

pub use fs::FsWorkspace;
pub use glob::GlobMatcher;
pub use memory::MemoryWorkspace;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use crate::error::Result;
use crate::stream::{self, ContentStream};

/// A file-like resource: a virtual path plus a replaceable content stream
pub struct Resource {
    path: String,
    stream: ContentStream,
}

impl Resource {
    pub fn new(path: impl Into<String>, stream: ContentStream) -> Self {
        Self {
            path: path.into(),
            stream,
        }
    }

    pub fn from_bytes(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self::new(path, stream::from_bytes(content))
    }

    /// Virtual path, always starting with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Take the current content stream, leaving an empty one behind
    pub fn take_stream(&mut self) -> ContentStream {
        std::mem::replace(&mut self.stream, stream::empty())
    }

    /// Rebind the content to a new stream
    pub fn set_stream(&mut self, stream: ContentStream) {
        self.stream = stream;
    }

    /// Drain the content stream
    pub async fn into_bytes(self) -> Result<Bytes> {
        stream::collect_bytes(self.stream).await
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Read/write access to the resources of the project being built
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Resolve glob patterns to matching resources
    async fn by_glob(&self, patterns: &[String]) -> Result<Vec<Resource>>;

    /// Persist a resource, draining its content stream
    async fn write(&self, resource: Resource) -> Result<()>;
}

/// Normalize a virtual path to start with a single `/`
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    format!("/{}", path.trim_start_matches('/'))
}
