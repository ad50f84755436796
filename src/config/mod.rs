// Configuration: constants, environment loading and task options

pub mod constants;
pub mod env;
pub mod options;

pub use env::EnvMap;
pub use options::{FilePatterns, TaskConfiguration, TaskOptions};
