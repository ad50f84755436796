//! Environment map loaded once before the task runs

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::constants::ENV_FILE;
use crate::error::Result;

/// Ordered, read-only view of the environment the task was started with.
///
/// Built by the host during startup and handed to the placeholder table
/// builder. Iteration order is insertion order: process variables first,
/// then whatever the local override file added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    vars: IndexMap<String, String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the process environment.
    ///
    /// Entries whose key or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        let mut vars = IndexMap::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    vars.insert(key, value);
                }
                (Ok(key), Err(_)) => {
                    debug!("Skipping environment variable with non-unicode value: {}", key);
                }
                _ => debug!("Skipping environment variable with non-unicode name"),
            }
        }
        Self { vars }
    }

    /// Process environment plus the local `.env` file in the working directory.
    ///
    /// Never fails: an unreadable override file is logged and ignored.
    pub fn load() -> Self {
        let mut env = Self::from_process();
        if let Err(e) = env.load_env_file(ENV_FILE) {
            warn!("Failed to read {}: {}", ENV_FILE, e);
        }
        env
    }

    /// Merge `KEY=VALUE` lines from an override file.
    ///
    /// Keys already present are left untouched, so loading the same file twice
    /// is a no-op. A missing file is not an error. Returns the number of
    /// variables added.
    pub fn load_env_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Environment file not found: {}", path.display());
            return Ok(0);
        }

        let content = std::fs::read_to_string(path)?;
        let mut added = 0;
        for (key, value) in parse_env_content(&content) {
            if !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                added += 1;
            }
        }

        info!("Loaded {} variable(s) from: {}", added, path.display());
        Ok(added)
    }

    /// Set a variable, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

/// Parse dotenv-style content into ordered key/value pairs
fn parse_env_content(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        if key.is_empty() {
            continue;
        }
        let value = unquote(line[eq_pos + 1..].trim());

        pairs.push((key.to_string(), value.to_string()));
    }

    pairs
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
