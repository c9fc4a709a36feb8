// Worker configuration
// Decision: Everything comes from the environment (TEMPORAL_HOST, TEMPORAL_NAMESPACE)
// Decision: Raw values are kept as Options; accessors apply the defaults
// Decision: The task queue is fixed, the cross-language workflow routes ProcessGo to it

/// Environment variable holding the Temporal frontend address
pub const TEMPORAL_HOST_ENV: &str = "TEMPORAL_HOST";

/// Environment variable holding the Temporal namespace
pub const TEMPORAL_NAMESPACE_ENV: &str = "TEMPORAL_NAMESPACE";

/// Frontend address used when `TEMPORAL_HOST` is not set
pub const DEFAULT_TEMPORAL_HOST: &str = "temporal-frontend.temporal.svc.cluster.local:7233";

/// Namespace used when `TEMPORAL_NAMESPACE` is not set
pub const DEFAULT_TEMPORAL_NAMESPACE: &str = "default";

/// Task queue this worker polls. Not configurable.
pub const TASK_QUEUE: &str = "go-task-queue";

/// Configuration for the worker process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Temporal frontend address (host:port)
    pub temporal_host: Option<String>,
    /// Temporal namespace
    pub temporal_namespace: Option<String>,
}

impl WorkerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Variables that are missing or set to an empty string fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            temporal_host: non_empty(TEMPORAL_HOST_ENV),
            temporal_namespace: non_empty(TEMPORAL_NAMESPACE_ENV),
        }
    }

    /// Get Temporal address with default
    pub fn temporal_host(&self) -> &str {
        self.temporal_host
            .as_deref()
            .unwrap_or(DEFAULT_TEMPORAL_HOST)
    }

    /// Get Temporal namespace with default
    pub fn temporal_namespace(&self) -> &str {
        self.temporal_namespace
            .as_deref()
            .unwrap_or(DEFAULT_TEMPORAL_NAMESPACE)
    }

    /// Task queue the worker serves
    pub fn task_queue(&self) -> &'static str {
        TASK_QUEUE
    }
}
