use thiserror::Error;

#[derive(Error, Debug)]
pub enum KidscopeError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown engagement hook: {0}")]
    UnknownHook(String),

    #[error("Unknown age bracket: {0}")]
    UnknownAgeBracket(String),
}

pub type Result<T> = std::result::Result<T, KidscopeError>;
