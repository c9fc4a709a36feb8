// Integration tests for the worker lifecycle
//
// These tests drive WorkerProcess through in-memory backends that record
// every call, so the connect / start / stop / close ordering and the
// failure paths can be checked without a Temporal server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use polyglot_worker::{
    Connector, HandlerRegistry, OrchestrationClient, Payload, PayloadExt, ShutdownReason,
    ShutdownSignal, TaskWorker, WorkerConfig, WorkerError, WorkerProcess, WorkerState,
};
use tokio::sync::oneshot;

// =============================================================================
// Recording backend
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Connect { host: String, namespace: String },
    StartWorker { task_queue: String },
    Stop,
    Close,
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    registry: Arc<Mutex<Option<Arc<HandlerRegistry>>>>,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn registry(&self) -> Option<Arc<HandlerRegistry>> {
        self.registry.lock().unwrap().clone()
    }
}

#[derive(Clone, Copy, Default)]
enum Failure {
    #[default]
    None,
    Connect,
    Start,
}

struct RecordingConnector {
    recorder: Recorder,
    failure: Failure,
}

impl RecordingConnector {
    fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            failure: Failure::None,
        }
    }

    fn failing(recorder: &Recorder, failure: Failure) -> Self {
        Self {
            recorder: recorder.clone(),
            failure,
        }
    }
}

struct RecordingClient {
    recorder: Recorder,
    failure: Failure,
}

struct RecordingWorker {
    recorder: Recorder,
}

#[async_trait]
impl Connector for RecordingConnector {
    type Client = RecordingClient;

    async fn connect(
        &self,
        config: &WorkerConfig,
    ) -> polyglot_worker::error::Result<RecordingClient> {
        self.recorder.record(Call::Connect {
            host: config.temporal_host().to_string(),
            namespace: config.temporal_namespace().to_string(),
        });

        if let Failure::Connect = self.failure {
            return Err(WorkerError::connect(
                config.temporal_host(),
                anyhow::anyhow!("connection refused"),
            ));
        }

        Ok(RecordingClient {
            recorder: self.recorder.clone(),
            failure: self.failure,
        })
    }
}

#[async_trait]
impl OrchestrationClient for RecordingClient {
    type Worker = RecordingWorker;

    async fn start_worker(
        &self,
        _config: &WorkerConfig,
        registry: Arc<HandlerRegistry>,
    ) -> polyglot_worker::error::Result<RecordingWorker> {
        self.recorder.record(Call::StartWorker {
            task_queue: registry.task_queue().to_string(),
        });

        if let Failure::Start = self.failure {
            return Err(WorkerError::start(
                registry.task_queue(),
                anyhow::anyhow!("namespace not found"),
            ));
        }

        *self.recorder.registry.lock().unwrap() = Some(registry);
        Ok(RecordingWorker {
            recorder: self.recorder.clone(),
        })
    }

    async fn close(self) {
        self.recorder.record(Call::Close);
    }
}

#[async_trait]
impl TaskWorker for RecordingWorker {
    async fn stop(self) -> polyglot_worker::error::Result<()> {
        self.recorder.record(Call::Stop);
        Ok(())
    }
}

fn default_connect() -> Call {
    Call::Connect {
        host: "temporal-frontend.temporal.svc.cluster.local:7233".to_string(),
        namespace: "default".to_string(),
    }
}

fn start_go_queue() -> Call {
    Call::StartWorker {
        task_queue: "go-task-queue".to_string(),
    }
}

// =============================================================================
// Configuration reaches the connection attempt
// =============================================================================

#[test_log::test(tokio::test)]
async fn test_connects_with_default_values() {
    let recorder = Recorder::default();
    let config = WorkerConfig::from_lookup(|_| None);

    WorkerProcess::new(RecordingConnector::new(&recorder), config)
        .run(std::future::ready(()))
        .await
        .unwrap();

    assert_eq!(recorder.calls().first(), Some(&default_connect()));
}

#[test_log::test(tokio::test)]
async fn test_connects_with_overridden_values() {
    let recorder = Recorder::default();
    let config = WorkerConfig::from_lookup(|key| match key {
        "TEMPORAL_HOST" => Some("localhost:7233".to_string()),
        "TEMPORAL_NAMESPACE" => Some("polyglot".to_string()),
        _ => None,
    });

    WorkerProcess::new(RecordingConnector::new(&recorder), config)
        .run(std::future::ready(()))
        .await
        .unwrap();

    assert_eq!(
        recorder.calls().first(),
        Some(&Call::Connect {
            host: "localhost:7233".to_string(),
            namespace: "polyglot".to_string(),
        })
    );
}

// =============================================================================
// Serving until shutdown
// =============================================================================

#[test_log::test(tokio::test)]
async fn test_serves_until_shutdown_then_releases_in_reverse_order() {
    let recorder = Recorder::default();
    let process = WorkerProcess::new(RecordingConnector::new(&recorder), WorkerConfig::default());
    let mut state = process.subscribe();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(process.run(shutdown_rx));

    tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| *s == WorkerState::Serving),
    )
    .await
    .expect("worker never started serving")
    .unwrap();

    assert_eq!(recorder.calls(), vec![default_connect(), start_go_queue()]);
    assert!(!handle.is_finished());

    shutdown_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop after shutdown")
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(
        recorder.calls(),
        vec![default_connect(), start_go_queue(), Call::Stop, Call::Close]
    );
    assert_eq!(*state.borrow(), WorkerState::Stopped);
}

#[cfg(unix)]
#[test_log::test(tokio::test)]
async fn test_sigterm_stops_worker_and_releases_connection() {
    let recorder = Recorder::default();
    let process = WorkerProcess::new(RecordingConnector::new(&recorder), WorkerConfig::default());
    let mut state = process.subscribe();
    let shutdown = ShutdownSignal::install().unwrap();

    let handle = tokio::spawn(async move {
        let received = Arc::new(Mutex::new(None));
        let seen = received.clone();
        let result = process
            .run(async move {
                let reason = shutdown.recv().await;
                *seen.lock().unwrap() = Some(reason);
            })
            .await;
        let reason = *received.lock().unwrap();
        (result, reason)
    });

    tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| *s == WorkerState::Serving),
    )
    .await
    .expect("worker never started serving")
    .unwrap();

    let status = tokio::process::Command::new("kill")
        .arg("-TERM")
        .arg(std::process::id().to_string())
        .status()
        .await
        .unwrap();
    assert!(status.success());

    let (result, reason) = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop after SIGTERM")
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(reason, Some(ShutdownReason::Terminate));
    assert_eq!(
        recorder.calls(),
        vec![default_connect(), start_go_queue(), Call::Stop, Call::Close]
    );
    assert_eq!(*state.borrow(), WorkerState::Stopped);
}

#[test_log::test(tokio::test)]
async fn test_registered_handlers_are_served() {
    let recorder = Recorder::default();

    WorkerProcess::new(RecordingConnector::new(&recorder), WorkerConfig::default())
        .run(std::future::ready(()))
        .await
        .unwrap();

    let registry = recorder.registry().expect("registry was not handed to the worker");
    assert_eq!(registry.workflow_types(), vec!["GoWorkflow"]);
    assert_eq!(registry.activity_types(), vec!["ProcessGo"]);

    let greeting = registry
        .run_workflow("GoWorkflow", &[Payload::json("Temporal").unwrap()])
        .unwrap();
    assert_eq!(
        greeting.decode::<String>().unwrap(),
        "Hello from Go worker, Temporal!"
    );

    let said = registry
        .run_activity(
            "ProcessGo",
            &[Payload::json("ping").unwrap(), Payload::json("rust").unwrap()],
        )
        .unwrap();
    assert_eq!(said.decode::<String>().unwrap(), "Go says: ping");
}

// =============================================================================
// Failure paths
// =============================================================================

#[test_log::test(tokio::test)]
async fn test_connection_failure_does_not_register_or_serve() {
    let recorder = Recorder::default();
    let process = WorkerProcess::new(
        RecordingConnector::failing(&recorder, Failure::Connect),
        WorkerConfig::default(),
    );
    let state = process.subscribe();

    let result = process.run(std::future::pending::<()>()).await;

    assert!(matches!(result, Err(WorkerError::Connect { .. })));
    assert_eq!(recorder.calls(), vec![default_connect()]);
    assert!(recorder.registry().is_none());
    assert_eq!(*state.borrow(), WorkerState::NotStarted);
}

#[test_log::test(tokio::test)]
async fn test_start_failure_closes_connection() {
    let recorder = Recorder::default();

    let result = WorkerProcess::new(
        RecordingConnector::failing(&recorder, Failure::Start),
        WorkerConfig::default(),
    )
    .run(std::future::pending::<()>())
    .await;

    assert!(matches!(result, Err(WorkerError::Start { .. })));
    assert_eq!(
        recorder.calls(),
        vec![default_connect(), start_go_queue(), Call::Close]
    );
}
