use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Job creation failed: {0}")]
    JobCreate(String),

    #[error("Trigger creation failed: {0}")]
    TriggerCreate(String),

    #[error("Store request failed: {0}")]
    Store(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution already confirmed or unknown: {0}")]
    UnknownConfirmation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
