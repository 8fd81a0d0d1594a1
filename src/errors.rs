/// Stackforest Error Types
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// A name or index does not resolve to an occupied slot
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Create or rename collides with an occupied slot
    #[error("Duplicate node name: {0}")]
    DuplicateNodeName(String),

    /// A VCS driver call returned a failing status or an unexpected state
    #[error("External command failed: {step} ({})", describe_status(.code))]
    ExternalCommandFailure { step: String, code: Option<i32> },

    /// The tree file on disk does not describe a valid forest
    #[error("Corrupt tree file: {0}")]
    CorruptPersistedState(String),

    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "unexpected state".to_string(),
    }
}

impl ForestError {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        ForestError::NodeNotFound(what.into())
    }

    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        ForestError::DuplicateNodeName(name.into())
    }

    pub fn external<S: Into<String>>(step: S, code: Option<i32>) -> Self {
        ForestError::ExternalCommandFailure {
            step: step.into(),
            code,
        }
    }

    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        ForestError::CorruptPersistedState(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        ForestError::Config(msg.into())
    }

    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        ForestError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ForestError>;
