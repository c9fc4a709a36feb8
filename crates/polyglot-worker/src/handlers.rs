// Workflow and activity bodies served on the go-task-queue
// Decision: Type names match the Go worker so the cross-language workflow can route to us
// Decision: The language argument stays in the activity signature but is not used

/// Label the handlers use to identify this worker in their output
pub const SOURCE: &str = "Go";

/// Workflow type name registered with Temporal
pub const WORKFLOW_TYPE: &str = "GoWorkflow";

/// Activity type name registered with Temporal
pub const ACTIVITY_TYPE: &str = "ProcessGo";

/// Greeting workflow: `"Hello from Go worker, <name>!"`
pub fn go_workflow(name: &str) -> String {
    format!("Hello from {SOURCE} worker, {name}!")
}

/// Message activity: `"Go says: <message>"`
///
/// `language` is accepted for compatibility with callers that pass it, and is
/// otherwise inert.
pub fn process_go(message: &str, _language: &str) -> String {
    format!("{SOURCE} says: {message}")
}
