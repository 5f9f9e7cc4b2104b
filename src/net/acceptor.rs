//! Single accept loop, strict round-robin dispatch to worker reactors.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tracing::{error, info, warn};

use super::worker::WorkerHandle;
use super::ServerError;
use crate::server::Server;

/// Bind the listener and run the accept loop on its own single-threaded
/// runtime, dispatching each accepted connection to workers in strict
/// round-robin order. Blocks until the listener is closed (never, in
/// this service, there is no graceful shutdown protocol in scope).
pub fn run_acceptor(ctx: Arc<Server>, workers: Vec<WorkerHandle>) -> Result<(), ServerError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServerError::RuntimeBuild)?;

    runtime.block_on(accept_loop(ctx, workers))
}

async fn accept_loop(ctx: Arc<Server>, workers: Vec<WorkerHandle>) -> Result<(), ServerError> {
    let addr = format!("{}:{}", ctx.config.listener.ip, ctx.config.listener.port);
    let listener = TcpListener::bind(&addr).await.map_err(|source| ServerError::Bind {
        addr: addr.clone(),
        source,
    })?;
    info!(%addr, worker_count = workers.len(), "listening");

    let mut last_worker: Option<usize> = None;
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "accept failed, continuing");
                continue;
            }
        };

        let target_idx = match last_worker {
            Some(idx) => (idx + 1) % workers.len(),
            None => 0,
        };
        last_worker = Some(target_idx);

        let target = &workers[target_idx];
        if let Err(e) = target.sender.send((stream, peer)) {
            // The worker thread is gone; the connection is dropped with
            // it. Logged, not fatal: a failed hand-off may leak one
            // connection, not take down the acceptor.
            error!(worker = target_idx, error = %e, "failed to hand off connection");
        }
    }
}
