pub mod config;
pub mod error;
pub mod types;
pub mod wire;

pub use config::AnalysisConfig;
pub use error::{KidscopeError, Result};
pub use types::*;
pub use wire::{parse_script, parse_videos, script_schema};
