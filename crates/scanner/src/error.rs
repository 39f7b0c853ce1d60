use thiserror::Error;

use common::error::Error as ArbCycleError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Graph processing error: {0}")]
    GraphError(#[from] ArbCycleError),

    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse rate matrix: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to serialize report: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
