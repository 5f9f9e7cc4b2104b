//! In-memory, network-accessible FIFO message queue service.
//!
//! # Architecture
//! - **core**: storage engine (slot pool, blocks, items, queues, free-block pool)
//! - **registry**: name -> queue lookup with lazy creation
//! - **protocol**: wire framing and command dispatch
//! - **net**: acceptor + worker reactors, connection state machine
//! - **config**: `config.toml` loading
//! - **logging**: tracing setup
//! - **server**: process-wide context shared by the acceptor and workers

pub mod config;
pub mod core;
pub mod logging;
pub mod net;
pub mod protocol;
pub mod registry;
pub mod server;

use thiserror::Error;

/// Top-level error type for the service.
#[derive(Error, Debug)]
pub enum FifodError {
    #[error("pool error: {0}")]
    Pool(#[from] core::pool::PoolError),

    #[error("queue error: {0}")]
    Queue(#[from] core::queue::QueueError),

    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("fatal initialization error: {0}")]
    FatalInit(#[from] net::ServerError),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, FifodError>;
