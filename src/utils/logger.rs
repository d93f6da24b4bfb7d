use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::debug;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();
static LOGGER_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,app::wellness=debug,app::db=info";

/// Installs the global subscriber: a daily rolling file under `log_dir` plus stdout.
///
/// Subsequent calls are no-ops. When the host process already installed a
/// global subscriber, that one is kept and this returns `Ok`.
pub fn init_logging(log_dir: &Path) -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            if tracing::dispatcher::has_been_set() {
                debug!(target: "app::logging", "global subscriber already installed, keeping it");
                return Ok(());
            }

            std::fs::create_dir_all(log_dir)?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "stackr.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let env_filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
                .map_err(|err| AppError::other(format!("invalid log directives: {err}")))?;

            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .try_init();

            match installed {
                // the guard must outlive the process for the file writer to flush
                Ok(()) => {
                    let _ = LOGGER_GUARD.set(guard);
                }
                Err(err) => {
                    debug!(target: "app::logging", error = %err, "subscriber not installed, keeping existing one");
                }
            }

            Ok(())
        })
        .map(|_| ())
}
