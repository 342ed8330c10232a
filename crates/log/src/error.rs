/// Errors raised while installing a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

impl LogError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter(_) => "LOG_FILTER",
            Self::AlreadyInitialized => "LOG_ALREADY_INIT",
        }
    }
}

/// Result alias for logging setup.
pub type LogResult<T> = Result<T, LogError>;
