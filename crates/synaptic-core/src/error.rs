use thiserror::Error;

/// Framework-wide error type returned across crate boundaries.
#[derive(Debug, Error)]
pub enum SynapticError {
    #[error("tool error: {0}")]
    Tool(String),
    #[error("config error: {0}")]
    Config(String),
}
