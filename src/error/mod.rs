/// Centralized error handling for the string replacer
pub mod replacer;

pub use replacer::{ReplacerError, Result};
