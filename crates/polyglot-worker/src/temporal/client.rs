// Temporal client wrapper
// Decision: Wrap the temporalio-client / temporal-sdk-core APIs behind the backend traits
//
// This module provides:
// - Connection management to Temporal server (TemporalConnector)
// - Worker start on the task queue (TemporalClient::start_worker)

use std::sync::Arc;

use async_trait::async_trait;
use temporal_sdk_core::{init_worker, CoreRuntime, RuntimeOptions, WorkerConfig as CoreWorkerConfig};
use temporalio_client::{Client, ClientOptions, RetryClient};
use temporalio_common::worker::{WorkerTaskTypes, WorkerVersioningStrategy};
use temporalio_common::Worker as WorkerTrait;
use tracing::info;

use super::worker::TemporalTaskWorker;
use crate::backend::{Connector, OrchestrationClient};
use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};
use crate::registry::HandlerRegistry;

/// Client name reported to the Temporal frontend
const CLIENT_NAME: &str = "polyglot-worker";

const MAX_CACHED_WORKFLOWS: usize = 100;
const MAX_OUTSTANDING_WORKFLOW_TASKS: usize = 100;
const MAX_OUTSTANDING_ACTIVITIES: usize = 100;

/// Opens connections to a Temporal frontend
#[derive(Debug, Clone)]
pub struct TemporalConnector {
    identity: String,
}

impl TemporalConnector {
    pub fn new() -> Self {
        Self {
            identity: format!("{}-{}", CLIENT_NAME, uuid::Uuid::now_v7()),
        }
    }

    /// Worker identity shown in the Temporal UI
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl Default for TemporalConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TemporalConnector {
    type Client = TemporalClient;

    async fn connect(&self, config: &WorkerConfig) -> Result<TemporalClient> {
        let address = config.temporal_host();
        let target_url: url::Url =
            format!("http://{}", address)
                .parse()
                .map_err(|e: url::ParseError| WorkerError::InvalidAddress {
                    address: address.to_string(),
                    reason: e.to_string(),
                })?;

        let client_opts = ClientOptions::builder()
            .target_url(target_url)
            .client_name(CLIENT_NAME)
            .client_version(env!("CARGO_PKG_VERSION"))
            .identity(self.identity.clone())
            .build();

        let client = client_opts
            .connect(config.temporal_namespace().to_string(), None)
            .await
            .map_err(|e| WorkerError::connect(address, e))?;

        info!(
            address = %address,
            namespace = %config.temporal_namespace(),
            identity = %self.identity,
            "Connected to Temporal server"
        );

        Ok(TemporalClient { client })
    }
}

/// A connection to the Temporal frontend
pub struct TemporalClient {
    client: RetryClient<Client>,
}

impl TemporalClient {
    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &RetryClient<Client> {
        &self.client
    }
}

#[async_trait]
impl OrchestrationClient for TemporalClient {
    type Worker = TemporalTaskWorker;

    async fn start_worker(
        &self,
        config: &WorkerConfig,
        registry: Arc<HandlerRegistry>,
    ) -> Result<TemporalTaskWorker> {
        let task_queue = registry.task_queue().to_string();

        let runtime = CoreRuntime::new_assume_tokio(RuntimeOptions::default())
            .map_err(|e| WorkerError::start(&task_queue, e))?;
        let runtime = Arc::new(runtime);

        let worker_config = CoreWorkerConfig::builder()
            .namespace(config.temporal_namespace().to_string())
            .task_queue(task_queue.clone())
            .max_cached_workflows(MAX_CACHED_WORKFLOWS)
            .max_outstanding_workflow_tasks(MAX_OUTSTANDING_WORKFLOW_TASKS)
            .max_outstanding_activities(MAX_OUTSTANDING_ACTIVITIES)
            .task_types(WorkerTaskTypes {
                enable_workflows: true,
                enable_local_activities: false,
                enable_remote_activities: true,
                enable_nexus: false,
            })
            .versioning_strategy(WorkerVersioningStrategy::None {
                build_id: env!("CARGO_PKG_VERSION").to_string(),
            })
            .build()
            .map_err(|e| WorkerError::start(&task_queue, anyhow::anyhow!("{}", e)))?;

        let worker = init_worker(&runtime, worker_config, self.client.clone())
            .map_err(|e| WorkerError::start(&task_queue, e))?;

        // Fails when the namespace does not exist or the server rejects the worker.
        WorkerTrait::validate(&worker)
            .await
            .map_err(|e| WorkerError::start(&task_queue, e))?;

        Ok(TemporalTaskWorker::spawn(worker, runtime, registry))
    }

    async fn close(self) {
        info!("Closing Temporal client");
        drop(self.client);
    }
}
