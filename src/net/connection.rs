//! Per-connection workspace and read/parse/dispatch loop.
//!
//! State machine: `NEW -> ADOPTED -> (READING <-> PARSING <-> STREAMING_BIG) -> CLOSED`.
//! `NEW`/`ADOPTED` are the worker's hand-off bookkeeping (see
//! [`crate::net::worker`]); everything from `READING` on is this
//! function's loop. The per-connection workspace is just Rust
//! ownership: dropping this task's locals frees the receive buffer and
//! closes the socket atomically, the safe-Rust equivalent of
//! "destroy(pool)".

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::protocol::{dispatch, ParseStep, Parser};
use crate::server::Server;

pub async fn handle_connection(mut stream: TcpStream, ctx: Arc<Server>, peer: SocketAddr) {
    let rbuf_init = ctx.config.connection.rbuf_init_size;
    let rbuf_max = ctx.config.connection.rbuf_max_size;

    let mut rbuf: Vec<u8> = Vec::with_capacity(rbuf_init);
    let mut parser = Parser::new();
    let mut read_chunk = vec![0u8; rbuf_init];

    loop {
        let n = match stream.read(&mut read_chunk).await {
            Ok(0) => {
                debug!(%peer, "connection closed by peer");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                warn!(%peer, error = %e, "transport read error, closing connection");
                return;
            }
        };
        rbuf.extend_from_slice(&read_chunk[..n]);

        // Drain fully: dispatch every complete command this read produced
        // before going back to the socket, per the worker's
        // non-yielding dispatch policy.
        loop {
            match parser.parse(&mut rbuf) {
                Ok(ParseStep::Command(cmd)) => {
                    let response = dispatch(cmd, &ctx.registry);
                    if let Err(e) = stream.write_all(&response).await {
                        warn!(%peer, error = %e, "transport write error, closing connection");
                        return;
                    }
                }
                Ok(ParseStep::NeedMoreData) => break,
                Err(e) => {
                    warn!(%peer, error = %e, "protocol violation, closing connection");
                    return;
                }
            }
        }

        if rbuf.len() >= rbuf_max && !parser.in_big_data_mode() {
            warn!(%peer, rbuf_max, "receive buffer at cap without a parseable command, closing");
            return;
        }
    }
}
