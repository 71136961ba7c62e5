pub mod aggregate;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod store;
pub mod validation;
pub mod views;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::DashboardConfig;
pub use crate::dashboard::{Dashboard, DashboardSnapshot};
pub use crate::errors::{AppError, AppResult};
pub use crate::store::RecordStore;

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// JSON logs to a daily-rolling file under `log_dir` when given, otherwise
/// human-readable logs on stderr. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<(), String> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
            let file_appender = tracing_appender::rolling::daily(log_dir, "dashboard.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = LOG_GUARD.set(guard);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(non_blocking)
                .try_init()
                .map_err(|error| error.to_string())
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| error.to_string()),
    }
}
