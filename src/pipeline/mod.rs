// Pipeline module - chunk stages and the substitution engine built on them

pub mod core;
pub mod stages;
pub mod substitute;

pub use self::core::{ChunkStage, StagePipeline, attach};
pub use stages::{ReplaceStage, Utf8Stage};
pub use substitute::apply_substitutions;
