//! Logging Infrastructure
//!
//! `RUST_LOG` selects levels (default `storefront_server=info,tower_http=info`).
//! `LOG_FORMAT=json` switches to JSON lines, `LOG_DIR` adds a daily rolling file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "storefront_server=info,tower_http=info";

/// Initialize the logger from the environment
///
/// The returned guard flushes the file writer on drop; keep it alive in `main`.
pub fn init_logger() -> Option<WorkerGuard> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(json, log_dir.as_deref())
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(json: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let mut guard = None;
    let result = match log_dir {
        Some(dir) if Path::new(dir).is_dir() => {
            let file_appender = tracing_appender::rolling::daily(dir, "storefront-server");
            let (writer, g) = tracing_appender::non_blocking(file_appender);
            guard = Some(g);
            if json {
                builder.json().with_writer(writer).try_init()
            } else {
                builder.with_ansi(false).with_writer(writer).try_init()
            }
        }
        _ if json => builder.json().try_init(),
        _ => builder.try_init(),
    };

    if let Err(e) = result {
        // a subscriber is already installed (tests, embedding)
        eprintln!("Logger already initialized: {e}");
    }

    guard
}
