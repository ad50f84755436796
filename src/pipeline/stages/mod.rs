pub mod replace;
pub mod utf8;

pub use replace::ReplaceStage;
pub use utf8::Utf8Stage;
