//! In-memory workspace

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

use super::glob::GlobMatcher;
use super::{Resource, Workspace, normalize_path};
use crate::error::{ReplacerError, Result};
use crate::stream;

/// Workspace holding every resource in memory, keyed by virtual path.
///
/// Content streams are produced in chunks of `chunk_size` bytes (0 means one
/// chunk per resource). Resolution returns resources in path order.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    files: Mutex<BTreeMap<String, Bytes>>,
    chunk_size: usize,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Add or replace a resource
    pub fn insert(&self, path: &str, content: impl Into<Bytes>) -> Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ReplacerError::workspace("workspace lock poisoned"))?;
        files.insert(normalize_path(path), content.into());
        Ok(())
    }

    /// Current content of a resource
    pub fn read(&self, path: &str) -> Option<Bytes> {
        let files = self.files.lock().ok()?;
        files.get(&normalize_path(path)).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Workspace for MemoryWorkspace {
    async fn by_glob(&self, patterns: &[String]) -> Result<Vec<Resource>> {
        let matcher = GlobMatcher::new(patterns)?;
        let files = self
            .files
            .lock()
            .map_err(|_| ReplacerError::workspace("workspace lock poisoned"))?;

        let resources: Vec<Resource> = files
            .iter()
            .filter(|(path, _)| matcher.is_match(path))
            .map(|(path, content)| {
                Resource::new(path.clone(), stream::chunked(content.clone(), self.chunk_size))
            })
            .collect();

        debug!("Resolved {} resource(s) for {:?}", resources.len(), patterns);
        Ok(resources)
    }

    async fn write(&self, resource: Resource) -> Result<()> {
        let path = normalize_path(resource.path());
        let content = resource.into_bytes().await?;

        let mut files = self
            .files
            .lock()
            .map_err(|_| ReplacerError::workspace("workspace lock poisoned"))?;
        debug!("Writing {} ({} bytes)", path, content.len());
        files.insert(path, content);
        Ok(())
    }
}
