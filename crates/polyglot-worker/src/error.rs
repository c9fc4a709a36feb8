// Error types for the worker
// Decision: WorkerError covers the process lifecycle (both startup failure points are fatal)
// Decision: HandlerError covers a single task; it is reported to Temporal, never fatal

use thiserror::Error;

/// Result type alias for worker lifecycle operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Errors that can occur while bringing the worker up or down
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The configured address cannot be turned into a target URL
    #[error("Invalid Temporal address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The connection to the orchestration service could not be established
    #[error("Unable to create client for {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: anyhow::Error,
    },

    /// The worker could not begin serving the task queue
    #[error("Unable to start worker on task queue '{task_queue}': {source}")]
    Start {
        task_queue: String,
        #[source]
        source: anyhow::Error,
    },

    /// The worker did not stop cleanly
    #[error("Worker shutdown failed: {0}")]
    Shutdown(String),
}

impl WorkerError {
    /// Create a connection error
    pub fn connect(address: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        WorkerError::Connect {
            address: address.into(),
            source: source.into(),
        }
    }

    /// Create a worker start error
    pub fn start(task_queue: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        WorkerError::Start {
            task_queue: task_queue.into(),
            source: source.into(),
        }
    }
}

/// Errors raised while dispatching a single workflow or activity task
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// No workflow registered under this type name
    #[error("Unknown workflow type: '{0}'")]
    UnknownWorkflow(String),

    /// No activity registered under this type name
    #[error("Unknown activity type: '{0}'")]
    UnknownActivity(String),

    /// A required positional argument was not supplied
    #[error("Missing argument {index} ({name})")]
    MissingArgument { index: usize, name: &'static str },

    /// Payload body is not valid for the expected type
    #[error("Failed to decode payload: {0}")]
    Decode(String),

    /// Result could not be serialized
    #[error("Failed to encode payload: {0}")]
    Encode(String),

    /// Payload uses an encoding this worker does not understand
    #[error("Unsupported payload encoding: '{0}'")]
    UnsupportedEncoding(String),
}
