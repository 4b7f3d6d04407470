use std::io;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Flushes buffered file output on drop; parked here for the life of the
/// process.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "overland.log";

/// Install the tracing subscriber: compact stderr output filtered through
/// `RUST_LOG` (default `info`), plus a daily-rolling plain-text file under
/// `logs/`. Panics are logged with a captured backtrace before unwinding.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true);

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        Path::new(LOG_DIR),
        LOG_FILE,
    ));
    let _ = LOG_GUARD.set(guard);

    let file_layer = fmt::layer()
        .compact()
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let message = info.payload_as_str().unwrap_or("<opaque panic payload>");
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!("panic at {location}: {message}\n{backtrace}");
    }));
}
