use std::time::Duration;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name recorded on claimed queue rows (default: `worker-<pid>`).
    pub name: String,
    /// Delay between queue polls (default: 1000 ms).
    pub poll_interval: Duration,
    /// Maximum jobs executing at once (default: `2`).
    pub concurrency: usize,
    /// Delete the uploaded document once its job has ended (default: `true`).
    pub cleanup_uploads: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default        |
    /// |---------------------------|----------------|
    /// | `WORKER_NAME`             | `worker-<pid>` |
    /// | `WORKER_POLL_INTERVAL_MS` | `1000`         |
    /// | `WORKER_CONCURRENCY`      | `2`            |
    /// | `WORKER_CLEANUP_UPLOADS`  | `true`         |
    pub fn from_env() -> Self {
        let name = std::env::var("WORKER_NAME")
            .unwrap_or_else(|_| format!("worker-{}", std::process::id()));

        let poll_interval_ms: u64 = std::env::var("WORKER_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("WORKER_POLL_INTERVAL_MS must be a valid u64");

        let concurrency: usize = std::env::var("WORKER_CONCURRENCY")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("WORKER_CONCURRENCY must be a valid usize");
        assert!(concurrency > 0, "WORKER_CONCURRENCY must be at least 1");

        let cleanup_uploads: bool = std::env::var("WORKER_CLEANUP_UPLOADS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("WORKER_CLEANUP_UPLOADS must be true or false");

        Self {
            name,
            poll_interval: Duration::from_millis(poll_interval_ms),
            concurrency,
            cleanup_uploads,
        }
    }
}
