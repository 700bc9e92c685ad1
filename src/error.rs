use thiserror::Error;

/// Unified error type for sprite-walk
#[derive(Error, Debug)]
pub enum SpriteError {
    /// Rejected before any tick runs: empty walk cycle, degenerate sprite box,
    /// malformed sheet or config value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A controller was used after it was detached. Not recoverable.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type SpriteResult<T> = Result<T, SpriteError>;
