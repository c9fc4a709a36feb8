// Temporal worker implementation
// Decision: Use the temporal-sdk-core Worker trait for polling and completion
//
// This worker:
// 1. Polls for workflow activations and answers them with commands
// 2. Polls for activity tasks and executes the registered activities
// 3. Drains both pollers on shutdown before shutting the core worker down

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use temporal_sdk_core::{CoreRuntime, Worker};
use temporalio_common::errors::PollError;
use temporalio_common::protos::coresdk::{
    activity_result::ActivityExecutionResult,
    activity_task::{activity_task, ActivityTask},
    workflow_activation::{workflow_activation_job, WorkflowActivation},
    workflow_commands::{workflow_command, CompleteWorkflowExecution, FailWorkflowExecution},
    workflow_completion::WorkflowActivationCompletion,
    ActivityTaskCompletion,
};
use temporalio_common::protos::temporal::api::failure::v1::Failure;
use temporalio_common::Worker as WorkerTrait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::convert::handler_failure;
use crate::backend::TaskWorker;
use crate::error::{Result, WorkerError};
use crate::registry::HandlerRegistry;

/// Pause after a failed poll before polling again
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Temporal worker that processes workflow and activity tasks
pub struct TemporalTaskWorker {
    /// Core worker shared with the pollers
    core: Arc<Worker>,
    /// Runtime the core worker was created on
    #[allow(dead_code)]
    runtime: Arc<CoreRuntime>,
    /// Shutdown signal sender
    shutdown_tx: watch::Sender<bool>,
    workflow_handle: JoinHandle<()>,
    activity_handle: JoinHandle<()>,
}

impl TemporalTaskWorker {
    /// Spawn the workflow and activity pollers
    pub(super) fn spawn(
        worker: Worker,
        runtime: Arc<CoreRuntime>,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        let core = Arc::new(worker);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(task_queue = %registry.task_queue(), "Starting Temporal pollers");

        let workflow_handle =
            spawn_workflow_poller(core.clone(), registry.clone(), shutdown_rx.clone());
        let activity_handle = spawn_activity_poller(core.clone(), registry, shutdown_rx);

        Self {
            core,
            runtime,
            shutdown_tx,
            workflow_handle,
            activity_handle,
        }
    }
}

#[async_trait]
impl TaskWorker for TemporalTaskWorker {
    async fn stop(self) -> Result<()> {
        info!("Shutting down Temporal worker");

        let _ = self.shutdown_tx.send(true);
        WorkerTrait::initiate_shutdown(self.core.as_ref());

        let (workflow_result, activity_result) =
            tokio::join!(self.workflow_handle, self.activity_handle);

        WorkerTrait::shutdown(self.core.as_ref()).await;

        workflow_result.map_err(|e| WorkerError::Shutdown(format!("workflow poller: {}", e)))?;
        activity_result.map_err(|e| WorkerError::Shutdown(format!("activity poller: {}", e)))?;

        info!("Temporal worker stopped");
        Ok(())
    }
}

/// Sleep for the back-off period; returns false if shutdown was requested meanwhile
async fn backoff(shutdown_rx: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => true,
        _ = shutdown_rx.changed() => false,
    }
}

/// Spawn workflow activation polling loop
fn spawn_workflow_poller(
    core: Arc<Worker>,
    registry: Arc<HandlerRegistry>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let activation = match WorkerTrait::poll_workflow_activation(core.as_ref()).await {
                Ok(activation) => activation,
                Err(PollError::ShutDown) => {
                    info!("Workflow poller received shutdown");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Workflow activation poll failed");
                    if !backoff(&mut shutdown_rx).await {
                        break;
                    }
                    continue;
                }
            };

            let completion = process_workflow_activation(&activation, &registry);
            if let Err(e) = WorkerTrait::complete_workflow_activation(core.as_ref(), completion).await {
                error!(run_id = %activation.run_id, error = %e, "Failed to complete workflow activation");
            }
        }
    })
}

/// Spawn activity task polling loop
fn spawn_activity_poller(
    core: Arc<Worker>,
    registry: Arc<HandlerRegistry>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let task = match WorkerTrait::poll_activity_task(core.as_ref()).await {
                Ok(task) => task,
                Err(PollError::ShutDown) => {
                    info!("Activity poller received shutdown");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Activity task poll failed");
                    if !backoff(&mut shutdown_rx).await {
                        break;
                    }
                    continue;
                }
            };

            if task.task_token.is_empty() {
                warn!("Received activity task with empty task token, skipping");
                continue;
            }

            let result = process_activity(&task, &registry);
            let completion = ActivityTaskCompletion {
                task_token: task.task_token,
                result: Some(result),
            };
            if let Err(e) = WorkerTrait::complete_activity_task(core.as_ref(), completion).await {
                error!(error = %e, "Failed to complete activity task");
            }
        }
    })
}

/// Process a workflow activation and build its completion.
///
/// The registered workflows finish in their first activation, so an
/// `InitializeWorkflow` job produces the terminal command directly. Every
/// other job (eviction included) is answered with an empty completion.
fn process_workflow_activation(
    activation: &WorkflowActivation,
    registry: &HandlerRegistry,
) -> WorkflowActivationCompletion {
    let mut commands = Vec::new();

    for job in &activation.jobs {
        match &job.variant {
            Some(workflow_activation_job::Variant::InitializeWorkflow(init)) => {
                info!(
                    workflow_id = %init.workflow_id,
                    workflow_type = %init.workflow_type,
                    "Running workflow"
                );

                let command = match registry.run_workflow(&init.workflow_type, &init.arguments) {
                    Ok(result) => workflow_command::Variant::CompleteWorkflowExecution(
                        CompleteWorkflowExecution {
                            result: Some(result),
                        },
                    ),
                    Err(e) => {
                        warn!(
                            workflow_id = %init.workflow_id,
                            workflow_type = %init.workflow_type,
                            error = %e,
                            "Workflow failed"
                        );
                        workflow_command::Variant::FailWorkflowExecution(FailWorkflowExecution {
                            failure: Some(handler_failure(&e)),
                        })
                    }
                };
                commands.push(command);
            }
            Some(workflow_activation_job::Variant::RemoveFromCache(_)) => {
                debug!(run_id = %activation.run_id, "Workflow evicted from cache");
            }
            other => {
                debug!(job = ?other, "Ignoring workflow activation job");
            }
        }
    }

    if commands.is_empty() {
        WorkflowActivationCompletion::empty(activation.run_id.clone())
    } else {
        WorkflowActivationCompletion::from_cmds(activation.run_id.clone(), commands)
    }
}

/// Process an activity task and return the result
fn process_activity(task: &ActivityTask, registry: &HandlerRegistry) -> ActivityExecutionResult {
    match &task.variant {
        Some(activity_task::Variant::Start(start)) => {
            info!(
                activity_type = %start.activity_type,
                workflow_type = %start.workflow_type,
                "Executing activity"
            );

            match registry.run_activity(&start.activity_type, &start.input) {
                Ok(output) => ActivityExecutionResult::ok(output),
                Err(e) => {
                    error!(
                        activity_type = %start.activity_type,
                        workflow_type = %start.workflow_type,
                        error = %e,
                        "Activity failed"
                    );
                    ActivityExecutionResult::fail(handler_failure(&e))
                }
            }
        }
        Some(activity_task::Variant::Cancel(_)) => {
            warn!("Activity cancellation requested");
            ActivityExecutionResult::cancel_from_details(None)
        }
        None => {
            error!("Activity task has no variant");
            ActivityExecutionResult::fail(Failure::application_failure(
                "Activity task has no variant".to_string(),
                true,
            ))
        }
    }
}
