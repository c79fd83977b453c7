use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{AppError, Result};

pub const LOG_ENV: &str = "EMPLEADOS_LOG";
const DEFAULT_LOG_DIRECTIVES: &str = "warn,empleados=info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Log to a daily-rolling file under `log_dir` so output never lands on top of
/// the terminal UI. With `stderr`, events are mirrored to stderr as well.
pub fn init(log_dir: &Path, stderr: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "empleados.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| AppError::Other("logging already initialized".into()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
        .map_err(|e| AppError::Other(format!("invalid log filter: {e}")))?;

    let stderr_layer = stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .with(stderr_layer)
        .try_init()
        .map_err(|e| AppError::Other(format!("failed to install logger: {e}")))?;

    Ok(())
}
