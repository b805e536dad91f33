use thiserror::Error;

#[derive(Debug, Error)]
pub enum DotclaudeError {
    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("source not found: {0}")]
    SourceMissing(String),

    #[error("source directory must be an absolute path: {0}")]
    RelativeSource(String),

    #[error("invalid link kind '{0}': must be dir or file")]
    InvalidLinkKind(String),

    #[error("invalid AFK state '{0}': must be on or off")]
    InvalidAfkState(String),

    #[error("invalid alert time '{0}': use HH:MM, YYYY-MM-DD HH:MM, +Nm or +Nh")]
    InvalidAlertTime(String),

    #[error("alert {0} not found")]
    AlertNotFound(u64),

    #[error("alert database error: {0}")]
    AlertDb(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DotclaudeError>;
