use std::path::PathBuf;
use std::str::FromStr;

/// How `POST /analyze` processes a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeMode {
    /// Persist a job record, enqueue the work, and return a task id.
    Async,
    /// Run the pipeline inside the request and return its output.
    Sync,
}

impl FromStr for AnalyzeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "async" => Ok(Self::Async),
            "sync" => Ok(Self::Sync),
            other => Err(format!("unknown analyze mode '{other}' (expected async or sync)")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Synchronous analyses
    /// run inside the request, so this bounds them too.
    pub request_timeout_secs: u64,
    /// How long to wait for an embedded worker to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory uploaded documents are written to (default: `data`).
    pub upload_dir: PathBuf,
    /// Maximum request body size for uploads (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// Processing mode for `POST /analyze` (default: `async`).
    pub analyze_mode: AnalyzeMode,
    /// Run a queue worker inside the API process (default: `false`).
    pub embedded_worker: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `UPLOAD_DIR`           | `data`                     |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                 |
    /// | `ANALYZE_MODE`         | `async`                    |
    /// | `EMBEDDED_WORKER`      | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "data".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let analyze_mode: AnalyzeMode = std::env::var("ANALYZE_MODE")
            .unwrap_or_else(|_| "async".into())
            .parse()
            .unwrap_or_else(|e| panic!("ANALYZE_MODE: {e}"));

        let embedded_worker: bool = std::env::var("EMBEDDED_WORKER")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("EMBEDDED_WORKER must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_dir,
            max_upload_bytes,
            analyze_mode,
            embedded_worker,
        }
    }
}
