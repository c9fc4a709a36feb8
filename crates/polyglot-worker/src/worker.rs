// Worker process lifecycle
// Decision: One linear flow: connect -> start worker -> wait for shutdown -> stop -> close
// Decision: Resources are released in reverse order of acquisition on every exit path
// Decision: Lifecycle state is published on a watch channel so callers can observe it

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use crate::backend::{Connector, OrchestrationClient, TaskWorker};
use crate::config::WorkerConfig;
use crate::error::Result;
use crate::registry::HandlerRegistry;

/// Lifecycle of the worker process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Not yet serving (connecting or starting)
    NotStarted,
    /// Polling the task queue
    Serving,
    /// Shut down, all resources released
    Stopped,
}

/// The worker process: owns the configuration, the registration set and
/// the connector used to reach the orchestration service.
pub struct WorkerProcess<C: Connector> {
    connector: C,
    config: WorkerConfig,
    registry: Arc<HandlerRegistry>,
    state_tx: watch::Sender<WorkerState>,
}

impl<C: Connector> WorkerProcess<C> {
    /// Create a worker serving the default Go workflow and activity
    pub fn new(connector: C, config: WorkerConfig) -> Self {
        Self::with_registry(connector, config, HandlerRegistry::with_defaults())
    }

    /// Create a worker with a custom registry
    pub(crate) fn with_registry(
        connector: C,
        config: WorkerConfig,
        registry: HandlerRegistry,
    ) -> Self {
        let (state_tx, _) = watch::channel(WorkerState::NotStarted);
        Self {
            connector,
            config,
            registry: Arc::new(registry),
            state_tx,
        }
    }

    /// Subscribe to lifecycle state changes
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state_tx.subscribe()
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        *self.state_tx.borrow()
    }

    /// Configuration in use
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the worker until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Fails without registering anything if the connection cannot be
    /// established, and fails after closing the connection if the worker
    /// cannot begin serving.
    pub async fn run<S>(self, shutdown: S) -> Result<()>
    where
        S: Future + Send,
    {
        info!(
            address = %self.config.temporal_host(),
            namespace = %self.config.temporal_namespace(),
            "Connecting to Temporal server"
        );

        let client = self.connector.connect(&self.config).await.map_err(|e| {
            error!(error = %e, "Unable to create client");
            e
        })?;

        let worker = match client.start_worker(&self.config, self.registry.clone()).await {
            Ok(worker) => worker,
            Err(e) => {
                error!(error = %e, "Unable to start worker");
                client.close().await;
                return Err(e);
            }
        };

        self.state_tx.send_replace(WorkerState::Serving);
        info!(
            task_queue = %self.registry.task_queue(),
            workflows = ?self.registry.workflow_types(),
            activities = ?self.registry.activity_types(),
            "Go worker started"
        );

        shutdown.await;

        info!("Shutdown requested, stopping worker");
        let stopped = worker.stop().await;
        if let Err(e) = &stopped {
            error!(error = %e, "Worker did not stop cleanly");
        }
        client.close().await;

        self.state_tx.send_replace(WorkerState::Stopped);
        info!("Worker shutdown complete");

        stopped
    }
}
