// Orchestration backend abstraction
// Decision: Three small traits mirror the three acquisition steps (connect, start, stop)
// Decision: close() and stop() take self by value so each resource is released once
// Decision: WorkerProcess is generic over Connector, tests plug in fakes

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::WorkerConfig;
use crate::error::Result;
use crate::registry::HandlerRegistry;

/// Opens connections to the orchestration service
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connection type produced on success
    type Client: OrchestrationClient;

    /// Establish a connection using the configured address and namespace
    async fn connect(&self, config: &WorkerConfig) -> Result<Self::Client>;
}

/// A live connection to the orchestration service, capable of serving handlers
#[async_trait]
pub trait OrchestrationClient: Send + Sync + Sized + 'static {
    /// Worker type that polls the task queue
    type Worker: TaskWorker;

    /// Register the handlers on the registry's task queue and begin polling
    async fn start_worker(
        &self,
        config: &WorkerConfig,
        registry: Arc<HandlerRegistry>,
    ) -> Result<Self::Worker>;

    /// Release the connection
    async fn close(self);
}

/// A worker polling a task queue
#[async_trait]
pub trait TaskWorker: Send + Sized + 'static {
    /// Stop accepting new tasks, let in-flight tasks finish and release the handlers
    async fn stop(self) -> Result<()>;
}
