//! Worker reactor: one OS thread per worker, each driving its own
//! single-threaded Tokio runtime and a `LocalSet` of adopted
//! connections. Hand-off from the acceptor arrives on an unbounded
//! `crossbeam::channel`, bridged into the async world via
//! `spawn_blocking` (the async-native counterpart of "wake on a
//! notification byte, then drain the FIFO").

use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{Receiver, Sender};
use tokio::net::TcpStream;
use tokio::runtime::Builder;
use tokio::task::LocalSet;
use tracing::{error, info};

use super::connection::handle_connection;
use super::ServerError;
use crate::server::Server;

/// What the acceptor hands off per accepted connection.
pub type Handoff = (TcpStream, SocketAddr);

/// A running worker reactor. Dropping the last `sender` clone closes
/// the channel, which drains the worker's loop and lets its thread
/// exit.
pub struct WorkerHandle {
    pub sender: Sender<Handoff>,
    pub thread: JoinHandle<()>,
}

/// Spawn one worker reactor thread, blocking until its runtime is
/// built (or has failed to build) so initialization failures can still
/// be treated as fatal by the caller, per the process's init-failure
/// exit policy.
pub fn spawn_worker(id: usize, ctx: Arc<Server>) -> Result<WorkerHandle, ServerError> {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), ServerError>>();

    let thread = std::thread::Builder::new()
        .name(format!("fifod-worker-{id}"))
        .spawn(move || run_worker(id, ctx, receiver, ready_tx))
        .map_err(ServerError::ThreadSpawn)?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(WorkerHandle { sender, thread }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ServerError::ThreadSpawn(std::io::Error::other(
            "worker thread exited before signaling readiness",
        ))),
    }
}

fn run_worker(
    id: usize,
    ctx: Arc<Server>,
    receiver: Receiver<Handoff>,
    ready_tx: std_mpsc::Sender<Result<(), ServerError>>,
) {
    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = ready_tx.send(Err(ServerError::RuntimeBuild(e)));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));

    let local = LocalSet::new();
    local.block_on(&runtime, async move {
        loop {
            let recv = receiver.clone();
            let handed_off = tokio::task::spawn_blocking(move || recv.recv().ok()).await;

            let (stream, peer) = match handed_off {
                Ok(Some(pair)) => pair,
                Ok(None) => {
                    info!(worker = id, "hand-off channel closed, worker shutting down");
                    break;
                }
                Err(e) => {
                    error!(worker = id, error = %e, "hand-off bridge task panicked");
                    break;
                }
            };

            let conn_ctx = Arc::clone(&ctx);
            tokio::task::spawn_local(handle_connection(stream, conn_ctx, peer));
        }
    });
}
