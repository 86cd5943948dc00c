use synaptic_core::SynapticError;
use thiserror::Error;

/// Single failure contract of the Hive client.
///
/// Transport-level errors from `reqwest` are converted into one of these
/// variants before they leave the crate.
#[derive(Debug, Error)]
pub enum HiveError {
    /// Missing or empty API key, unreadable settings file.
    #[error("hive config error: {0}")]
    Config(String),
    /// Neither `prompt` nor `messages` was supplied, or both were.
    #[error("invalid hive query: {0}")]
    InvalidInput(String),
    /// Network failure or timeout.
    #[error("hive request failed: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("hive API returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// A 2xx response whose body is not valid JSON.
    #[error("failed to parse hive response JSON: {0}")]
    MalformedResponse(String),
}

impl HiveError {
    /// HTTP status carried by the error, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HiveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<HiveError> for SynapticError {
    fn from(err: HiveError) -> Self {
        match err {
            HiveError::Config(msg) => SynapticError::Config(msg),
            other => SynapticError::Tool(other.to_string()),
        }
    }
}
