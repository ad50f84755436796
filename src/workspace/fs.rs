//! Filesystem workspace
//!
//! Reads resources from a source directory and writes them below a target
//! directory. Both may be the same directory: writes go to a temporary file
//! next to the target and are renamed into place only once the content
//! stream has been drained, so a resource is never truncated while its own
//! content is still being read.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use super::glob::GlobMatcher;
use super::{Resource, Workspace};
use crate::config::constants::READ_CHUNK_SIZE;
use crate::error::{ReplacerError, Result};
use crate::stream::ContentStream;

#[derive(Debug, Clone)]
pub struct FsWorkspace {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl FsWorkspace {
    /// Read and write in place
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_root: root.clone(),
            target_root: root,
        }
    }

    /// Read from `source_root`, write below `target_root`
    pub fn with_target(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    /// Map a virtual path onto a directory, refusing to leave it
    fn resolve(root: &Path, virtual_path: &str) -> Result<PathBuf> {
        let relative = Path::new(virtual_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ReplacerError::workspace(format!(
                "resource path escapes workspace: {}",
                virtual_path
            )));
        }
        Ok(root.join(relative))
    }

    fn collect_dir<'a>(
        &'a self,
        dir: &'a Path,
        matcher: &'a GlobMatcher,
        files: &'a mut Vec<String>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let mut file_type = entry.file_type().await?;

                if file_type.is_symlink() {
                    match tokio::fs::metadata(&path).await {
                        Ok(metadata) if metadata.is_file() => file_type = metadata.file_type(),
                        Ok(_) => {
                            debug!("Skipping symlink to directory: {:?}", path);
                            continue;
                        }
                        Err(e) => {
                            debug!("Skipping dangling symlink {:?}: {}", path, e);
                            continue;
                        }
                    }
                }

                if file_type.is_dir() {
                    self.collect_dir(&path, matcher, files).await?;
                } else if file_type.is_file() {
                    let Some(virtual_path) = self.virtual_path(&path) else {
                        warn!("Skipping non-unicode path: {:?}", path);
                        continue;
                    };
                    if matcher.is_match(&virtual_path) {
                        files.push(virtual_path);
                    }
                }
            }

            Ok(())
        })
    }

    fn virtual_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.source_root).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        Some(format!("/{}", parts?.join("/")))
    }
}

#[async_trait]
impl Workspace for FsWorkspace {
    async fn by_glob(&self, patterns: &[String]) -> Result<Vec<Resource>> {
        let matcher = GlobMatcher::new(patterns)?;
        let mut files = Vec::new();
        if matcher.has_includes() {
            self.collect_dir(&self.source_root, &matcher, &mut files).await?;
        }
        files.sort();

        debug!(
            "Resolved {} file(s) in {:?} for {:?}",
            files.len(),
            self.source_root,
            patterns
        );

        files
            .into_iter()
            .map(|virtual_path| {
                let path = Self::resolve(&self.source_root, &virtual_path)?;
                Ok(Resource::new(virtual_path, file_stream(path)))
            })
            .collect()
    }

    async fn write(&self, mut resource: Resource) -> Result<()> {
        let target = Self::resolve(&self.target_root, resource.path())?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = temp_path(&target)?;
        match write_and_replace(resource.take_stream(), &temp, &target).await {
            Ok(written) => {
                debug!("Written {} bytes to {:?}", written, target);
                Ok(())
            }
            Err(e) => {
                discard(&temp).await;
                Err(e)
            }
        }
    }
}

/// Drain `content` into `temp`, then rename it over `target`.
///
/// The temporary file is left behind on failure; the caller removes it.
async fn write_and_replace(
    mut content: ContentStream,
    temp: &Path,
    target: &Path,
) -> Result<usize> {
    let mut file = tokio::fs::File::create(temp).await?;

    let mut written = 0;
    while let Some(chunk) = content.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len();
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(temp, target).await?;
    Ok(written)
}

enum ReadState {
    Pending(PathBuf),
    Open(tokio::fs::File),
    Done,
}

/// Lazily opened, chunked file read
fn file_stream(path: PathBuf) -> ContentStream {
    Box::pin(stream::unfold(ReadState::Pending(path), |state| async move {
        let mut file = match state {
            ReadState::Pending(path) => match tokio::fs::File::open(&path).await {
                Ok(file) => file,
                Err(e) => return Some((Err(ReplacerError::from(e)), ReadState::Done)),
            },
            ReadState::Open(file) => file,
            ReadState::Done => return None,
        };

        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), ReadState::Open(file)))
            }
            Err(e) => Some((Err(ReplacerError::from(e)), ReadState::Done)),
        }
    }))
}

/// Temporary sibling of `path`, named `.{filename}.tmp`
fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ReplacerError::workspace(format!("not a file path: {:?}", path)))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

async fn discard(temp: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp).await {
        debug!("Failed to remove temporary file {:?}: {}", temp, e);
    }
}
