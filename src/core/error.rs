use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Dependency resolution error: {0}")]
    DependencyResolution(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Hook error: {0}")]
    Hook(#[from] anyhow::Error),

    #[error("Commit error: {0}")]
    Commit(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Config error: {0}")]
    Config(String),
}

impl HookError {
    /// Whether this error means "this hook never applies here" rather than a failure.
    pub fn is_void_signal(&self) -> bool {
        matches!(self, HookError::NotImplemented(_) | HookError::NotSupported(_))
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
