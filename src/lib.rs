//! Build task replacing placeholder strings in workspace resources with
//! values taken from `stringreplacer.<name>` environment variables.
//!
//! The host loads the environment once, builds a [`StringReplacerTask`] from
//! it and runs the task against its [`Workspace`] on every build.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod placeholder;
pub mod stream;
pub mod task;
pub mod workspace;

// Re-export commonly used types
pub use config::{EnvMap, FilePatterns, TaskConfiguration, TaskOptions};
pub use error::{ReplacerError, Result};
pub use pipeline::apply_substitutions;
pub use placeholder::{PlaceholderEntry, PlaceholderTable};
pub use stream::ContentStream;
pub use task::{BuildTask, StringReplacerTask, TaskParameters};
pub use workspace::{FsWorkspace, MemoryWorkspace, Resource, Workspace};
