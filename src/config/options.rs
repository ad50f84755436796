/// Task options as handed over by the host build
use serde::{Deserialize, Serialize};

use crate::error::{ReplacerError, Result};

/// Options the host passes to every task invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub configuration: TaskConfiguration,
}

/// Task-specific configuration block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskConfiguration {
    #[serde(default)]
    pub files: FilePatterns,
}

/// One glob pattern or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilePatterns {
    One(String),
    Many(Vec<String>),
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl FilePatterns {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern.clone()],
            Self::Many(patterns) => patterns.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(pattern) => pattern.is_empty(),
            Self::Many(patterns) => patterns.iter().all(String::is_empty),
        }
    }
}

impl TaskOptions {
    /// Options selecting the given patterns
    pub fn with_files<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            project_name: None,
            configuration: TaskConfiguration {
                files: FilePatterns::Many(patterns.into_iter().map(Into::into).collect()),
            },
        }
    }

    /// Parse options from the host's JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReplacerError::invalid_config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pattern() {
        let options =
            TaskOptions::from_json(r#"{"configuration": {"files": "**/*.js"}}"#).unwrap();
        assert_eq!(options.configuration.files.to_vec(), vec!["**/*.js"]);
        assert!(options.project_name.is_none());
    }

    #[test]
    fn test_pattern_list() {
        let options = TaskOptions::from_json(
            r#"{"projectName": "app", "configuration": {"files": ["**/*.js", "**/*.xml"]}}"#,
        )
        .unwrap();
        assert_eq!(options.project_name.as_deref(), Some("app"));
        assert_eq!(
            options.configuration.files,
            FilePatterns::Many(vec!["**/*.js".to_string(), "**/*.xml".to_string()])
        );
    }

    #[test]
    fn test_missing_configuration() {
        let options = TaskOptions::from_json("{}").unwrap();
        assert!(options.configuration.files.is_empty());
    }

    #[test]
    fn test_invalid_files_type() {
        let result = TaskOptions::from_json(r#"{"configuration": {"files": 42}}"#);
        assert!(result.is_err());
    }
}
