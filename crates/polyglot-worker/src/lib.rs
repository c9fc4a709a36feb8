pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod registry;
pub mod signal;
pub mod temporal;
pub mod worker;

// Re-export main types
pub use backend::{Connector, OrchestrationClient, TaskWorker};
pub use config::{WorkerConfig, TASK_QUEUE};
pub use error::{HandlerError, WorkerError};
pub use payload::{Payload, PayloadExt};
pub use registry::HandlerRegistry;
pub use signal::{ShutdownReason, ShutdownSignal};
pub use temporal::{TemporalClient, TemporalConnector, TemporalTaskWorker};
pub use worker::{WorkerProcess, WorkerState};
