//! The string replacer build task

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::constants::{FAILURE_MESSAGE, TASK_NAME};
use crate::config::{EnvMap, TaskOptions};
use crate::error::{ReplacerError, Result};
use crate::pipeline::apply_substitutions;
use crate::placeholder::PlaceholderTable;
use crate::workspace::Workspace;

/// Everything the host passes to one task invocation
#[derive(Clone, Copy)]
pub struct TaskParameters<'a> {
    pub workspace: &'a dyn Workspace,
    pub options: &'a TaskOptions,
}

/// A custom task the host build can run
#[async_trait]
pub trait BuildTask: Send + Sync {
    fn name(&self) -> String;

    /// Run the task. Failures are the task's own business; the host build
    /// always continues.
    async fn execute(&self, params: TaskParameters<'_>);
}

/// Replaces placeholder strings in the selected resources.
///
/// The placeholder table is fixed at construction and shared by every
/// invocation.
#[derive(Debug, Clone)]
pub struct StringReplacerTask {
    table: Arc<PlaceholderTable>,
}

impl StringReplacerTask {
    pub fn new(table: PlaceholderTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn from_env(env: &EnvMap) -> Self {
        Self::new(PlaceholderTable::from_env(env))
    }

    pub fn table(&self) -> &PlaceholderTable {
        &self.table
    }

    /// Resolve, substitute and write; returns the number of resources written
    pub async fn run(&self, params: TaskParameters<'_>) -> Result<usize> {
        let files = &params.options.configuration.files;
        if files.is_empty() {
            return Err(ReplacerError::invalid_config("no file patterns configured"));
        }

        let resources = params.workspace.by_glob(&files.to_vec()).await?;
        debug!("Matched {} resource(s)", resources.len());

        let resources = apply_substitutions(resources, &self.table);
        let results = join_all(
            resources
                .into_iter()
                .map(|resource| params.workspace.write(resource)),
        )
        .await;

        let written = results.len();
        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(written)
    }
}

#[async_trait]
impl BuildTask for StringReplacerTask {
    fn name(&self) -> String {
        TASK_NAME.to_string()
    }

    async fn execute(&self, params: TaskParameters<'_>) {
        match self.run(params).await {
            Ok(written) => info!(
                "Replaced {} placeholder(s) in {} resource(s)",
                self.table.len(),
                written
            ),
            Err(e) => {
                debug!("{} failed: {}", TASK_NAME, e);
                error!("{}", FAILURE_MESSAGE);
            }
        }
    }
}
