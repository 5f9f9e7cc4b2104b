//! Multi-reactor connection dispatcher: one acceptor thread, a fixed
//! pool of worker reactor threads, each driving its own single-threaded
//! Tokio runtime (the direct counterpart of one `libevent` `event_base`
//! per thread).

pub mod acceptor;
pub mod connection;
pub mod worker;

pub use acceptor::run_acceptor;
pub use worker::spawn_worker;

use thiserror::Error;

/// Fatal initialization failures. The process exits non-zero on any of
/// these; they never surface mid-run.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("failed to build worker runtime: {0}")]
    RuntimeBuild(#[source] std::io::Error),
}
