//! Structured Logger
//!
//! Wraps `tracing` to provide human-readable or JSON console output, optional
//! daily-rotated NDJSON files, and environment-based level control.

use psychoscore_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the file writer flushing; drop it only at process exit.
pub struct LoggerGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global logger from config.
///
/// `RUST_LOG` wins over `logging.level`. Calling this twice is harmless; the
/// second subscriber is ignored.
pub fn init_logger(config: &LoggingConfig) -> LoggerGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    // Rolling file appender: writes NDJSON to `<dir>/psychoscore.log.YYYY-MM-DD`
    let (file_layer, file_guard) = match &config.dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "psychoscore.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LoggerGuard { _file: file_guard }
}
