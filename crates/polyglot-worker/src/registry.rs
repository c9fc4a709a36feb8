// Handler registry for the task queue
// Decision: One registry per task queue, built once at startup and shared as Arc
// Decision: Builder pattern for fluent registration API; no mutation after build()
// Decision: with_defaults() registers GoWorkflow and ProcessGo on go-task-queue

use std::collections::HashMap;

use crate::config::TASK_QUEUE;
use crate::error::HandlerError;
use crate::handlers;
use crate::payload::{optional_arg, required_arg, Payload, PayloadExt};

/// Function that runs a registered handler over raw argument payloads.
pub type HandlerFn = Box<dyn Fn(&[Payload]) -> Result<Payload, HandlerError> + Send + Sync>;

/// Registration set: the workflows and activities served on one task queue.
///
/// # Example
///
/// ```ignore
/// let registry = HandlerRegistry::with_defaults();
/// assert_eq!(registry.task_queue(), "go-task-queue");
///
/// let result = registry.run_workflow("GoWorkflow", &args)?;
/// ```
pub struct HandlerRegistry {
    task_queue: String,
    workflows: HashMap<&'static str, HandlerFn>,
    activities: HashMap<&'static str, HandlerFn>,
}

impl HandlerRegistry {
    /// Registry for the go-task-queue with the Go workflow and activity
    pub fn with_defaults() -> Self {
        Self::builder(TASK_QUEUE)
            .workflow(handlers::WORKFLOW_TYPE, |args| {
                let name: String = required_arg(args, 0, "name")?;
                Payload::json(&handlers::go_workflow(&name))
            })
            .activity(handlers::ACTIVITY_TYPE, |args| {
                let message: String = required_arg(args, 0, "message")?;
                let language = optional_arg::<String>(args, 1)?.unwrap_or_default();
                Payload::json(&handlers::process_go(&message, &language))
            })
            .build()
    }

    /// Create a builder for fluent registration. The task queue is fixed
    /// for the process, so custom registries stay inside the crate.
    pub(crate) fn builder(task_queue: impl Into<String>) -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new(task_queue)
    }

    /// Task queue the handlers are registered against
    pub fn task_queue(&self) -> &str {
        &self.task_queue
    }

    /// Run a registered workflow
    ///
    /// # Errors
    ///
    /// Returns an error if the workflow type is not registered or the
    /// handler rejects its arguments.
    pub fn run_workflow(
        &self,
        workflow_type: &str,
        args: &[Payload],
    ) -> Result<Payload, HandlerError> {
        let handler = self
            .workflows
            .get(workflow_type)
            .ok_or_else(|| HandlerError::UnknownWorkflow(workflow_type.to_string()))?;
        handler(args)
    }

    /// Run a registered activity
    ///
    /// # Errors
    ///
    /// Returns an error if the activity type is not registered or the
    /// handler rejects its arguments.
    pub fn run_activity(
        &self,
        activity_type: &str,
        args: &[Payload],
    ) -> Result<Payload, HandlerError> {
        let handler = self
            .activities
            .get(activity_type)
            .ok_or_else(|| HandlerError::UnknownActivity(activity_type.to_string()))?;
        handler(args)
    }

    /// Check if a workflow type is registered
    pub fn has_workflow(&self, workflow_type: &str) -> bool {
        self.workflows.contains_key(workflow_type)
    }

    /// Check if an activity type is registered
    pub fn has_activity(&self, activity_type: &str) -> bool {
        self.activities.contains_key(activity_type)
    }

    /// Get all registered workflow types
    pub fn workflow_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.workflows.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Get all registered activity types
    pub fn activity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.activities.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("task_queue", &self.task_queue)
            .field("workflow_types", &self.workflow_types())
            .field("activity_types", &self.activity_types())
            .finish()
    }
}

/// Builder for creating a HandlerRegistry with a fluent API.
pub(crate) struct HandlerRegistryBuilder {
    registry: HandlerRegistry,
}

impl HandlerRegistryBuilder {
    /// Create a new builder with an empty registry
    pub(crate) fn new(task_queue: impl Into<String>) -> Self {
        Self {
            registry: HandlerRegistry {
                task_queue: task_queue.into(),
                workflows: HashMap::new(),
                activities: HashMap::new(),
            },
        }
    }

    /// Register a workflow handler. A later registration under the same
    /// name replaces the earlier one.
    pub(crate) fn workflow<F>(mut self, workflow_type: &'static str, handler: F) -> Self
    where
        F: Fn(&[Payload]) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.registry.workflows.insert(workflow_type, Box::new(handler));
        self
    }

    /// Register an activity handler. A later registration under the same
    /// name replaces the earlier one.
    pub(crate) fn activity<F>(mut self, activity_type: &'static str, handler: F) -> Self
    where
        F: Fn(&[Payload]) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.registry.activities.insert(activity_type, Box::new(handler));
        self
    }

    /// Build the registry
    pub(crate) fn build(self) -> HandlerRegistry {
        self.registry
    }
}
