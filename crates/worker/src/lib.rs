//! Background execution of queued document analyses.
//!
//! [`execute_job`] runs one job and settles its record; [`Worker`] polls the
//! queue and runs claimed jobs concurrently. The worker can run as its own
//! process (`findoc-worker`) or be embedded in the API server.

pub mod config;
pub mod error;
pub mod execute;
pub mod runner;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use execute::{execute_job, Settlement};
pub use runner::Worker;
