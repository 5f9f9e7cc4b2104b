//! Centralized file-based logging system.
//!
//! Writes logs to files in `logs/`, separated by concern:
//! - `logs/main` - general application logs
//! - `logs/error` - error and warning logs only
//! - `logs/net` - acceptor/worker/connection logs
//! - `logs/queue` - queue and pool allocation logs

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Initialize centralized file logging.
///
/// Creates the `logs/` directory and sets up file appenders per concern
/// plus a console layer. Returns the `WorkerGuard`s, which must be kept
/// alive for the duration of the program.
pub fn init_logging() -> Vec<WorkerGuard> {
    let logs_dir = Path::new("logs");
    if !logs_dir.exists() {
        fs::create_dir_all(logs_dir).expect("failed to create logs directory");
    }

    let log_types = ["main", "error", "net", "queue"];
    for log_type in &log_types {
        let dir = logs_dir.join(log_type);
        if !dir.exists() {
            fs::create_dir_all(&dir).expect("failed to create log subdirectory");
        }
    }

    let mut guards = Vec::new();

    let (main_appender, main_guard) = create_appender("logs/main", "main");
    guards.push(main_guard);

    let (error_appender, error_guard) = create_appender("logs/error", "error");
    guards.push(error_guard);

    let (net_appender, net_guard) = create_appender("logs/net", "net");
    guards.push(net_guard);

    let (queue_appender, queue_guard) = create_appender("logs/queue", "queue");
    guards.push(queue_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let net_layer = tracing_subscriber::fmt::layer()
        .with_writer(net_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("net")
                || metadata.target().contains("acceptor")
                || metadata.target().contains("worker")
                || metadata.target().contains("connection")
        }));

    let queue_layer = tracing_subscriber::fmt::layer()
        .with_writer(queue_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("queue")
                || metadata.target().contains("pool")
                || metadata.target().contains("registry")
        }));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(main_layer)
        .with(error_layer)
        .with(net_layer)
        .with(queue_layer)
        .with(console_layer)
        .init();

    tracing::info!("logging system initialized, log files in logs/ directory");

    guards
}

fn create_appender(dir: &str, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);
    tracing_appender::non_blocking(appender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_creation() {
        let test_dir = Path::new("logs_test_logging");
        if test_dir.exists() {
            fs::remove_dir_all(test_dir).ok();
        }

        fs::create_dir_all(test_dir.join("main")).unwrap();
        assert!(test_dir.join("main").exists());

        fs::remove_dir_all(test_dir).ok();
    }
}
