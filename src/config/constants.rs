//! Constants for the string replacer task

/// Prefix marking an environment variable as a placeholder definition
pub const ENV_PREFIX: &str = "stringreplacer.";

/// Local environment override file, read from the working directory
pub const ENV_FILE: &str = ".env";

/// Name the task is registered under in the host build
pub const TASK_NAME: &str = "ui5-task-stringreplacer";

/// Logged once whenever an invocation fails for any reason
pub const FAILURE_MESSAGE: &str =
    "Failed to replace strings. Please check file patterns and string placeholders.";

/// Chunk size for reading files from disk
pub const READ_CHUNK_SIZE: usize = 64 * 1024;
