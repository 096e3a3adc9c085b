use std::io;

use thiserror::Error;

/// Failures that end a session. The simulation itself cannot fail; these all
/// come from configuration or the terminal around it.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("initialization failed: {0}")]
    InitializationFailure(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}
