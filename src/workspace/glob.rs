//! Glob matching for workspace resolution

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{ReplacerError, Result};

/// Compiled include/exclude glob patterns.
///
/// Patterns are matched against virtual paths without their leading `/`.
/// A pattern starting with `!` excludes whatever it matches. `*` does not
/// cross directory separators; `**` does.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    includes: GlobSet,
    excludes: GlobSet,
    include_count: usize,
}

impl GlobMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for pattern in patterns {
            match pattern.strip_prefix('!') {
                Some(negated) => excludes.push(negated),
                None => includes.push(pattern.as_str()),
            }
        }

        Ok(Self {
            include_count: includes.len(),
            includes: build_globset(&includes)?,
            excludes: build_globset(&excludes)?,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.includes.is_match(path) && !self.excludes.is_match(path)
    }

    /// Whether any include pattern was given
    pub fn has_includes(&self) -> bool {
        self.include_count > 0
    }
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized = pattern.trim_start_matches('/');
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .build()
            .map_err(|e| ReplacerError::glob(*pattern, e))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| ReplacerError::glob(patterns.join(", "), e))
}
