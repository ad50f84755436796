//! Placeholder table built from `stringreplacer.<name>` environment variables

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::EnvMap;
use crate::config::constants::ENV_PREFIX;

/// Matches `stringreplacer.<name>` with a case-insensitive prefix; the name
/// never spans a line terminator
static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn key_pattern() -> &'static Regex {
    KEY_PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^{}([^\n\r\x{{2028}}\x{{2029}}]+)$",
            regex::escape(ENV_PREFIX)
        ))
        .expect("placeholder key pattern is valid")
    })
}

/// A literal placeholder and the text that replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    pub placeholder: String,
    pub value: String,
}

impl PlaceholderEntry {
    pub fn new(placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: value.into(),
        }
    }
}

/// Ordered placeholder entries, applied front to back.
///
/// Entries are never deduplicated. Keys differing only in prefix casing
/// produce separate entries and both are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: Vec<PlaceholderEntry>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the environment for placeholder definitions, keeping iteration order
    pub fn from_env(env: &EnvMap) -> Self {
        let pattern = key_pattern();
        let entries: Vec<PlaceholderEntry> = env
            .iter()
            .filter_map(|(key, value)| {
                let name = pattern.captures(key)?.get(1)?.as_str();
                Some(PlaceholderEntry::new(name, value))
            })
            .collect();

        debug!("Found {} placeholder definition(s) in environment", entries.len());
        Self { entries }
    }

    pub fn entries(&self) -> &[PlaceholderEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceholderEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<PlaceholderEntry>> for PlaceholderTable {
    fn from(entries: Vec<PlaceholderEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a PlaceholderTable {
    type Item = &'a PlaceholderEntry;
    type IntoIter = std::slice::Iter<'a, PlaceholderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
