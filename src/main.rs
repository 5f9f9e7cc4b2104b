//! In-memory, network-accessible FIFO message queue service.
//!
//! # Architecture
//! - **core**: storage engine (slot pool, blocks, items, queues, free-block pool)
//! - **registry**: name -> queue lookup with lazy creation
//! - **protocol**: wire framing and command dispatch
//! - **net**: acceptor + worker reactors, connection state machine
//! - **config**: `config.toml` loading
//! - **logging**: tracing setup
//!
//! The acceptor and every worker reactor each own an independent OS
//! thread and an independent single-threaded Tokio runtime; `main`
//! itself stays synchronous and just wires them together before
//! blocking on the acceptor.

use std::process::ExitCode;

use fifod::config::Config;
use fifod::net::{run_acceptor, spawn_worker};
use fifod::server::Server;

fn main() -> ExitCode {
    let _guards = fifod::logging::init_logging();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let worker_count = config.listener.worker_thread_num.max(1);
    let ctx = Server::new(config);

    tracing::info!(worker_count, "starting worker reactors");
    let mut workers = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        match spawn_worker(id, std::sync::Arc::clone(&ctx)) {
            Ok(handle) => workers.push(handle),
            Err(e) => {
                tracing::error!(worker = id, error = %e, "fatal: failed to start worker");
                return ExitCode::FAILURE;
            }
        }
    }

    match run_acceptor(ctx, workers) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal: acceptor failed");
            ExitCode::FAILURE
        }
    }
}
