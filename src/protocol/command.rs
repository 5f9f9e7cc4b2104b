//! Parsed wire commands, ready for dispatch against the registry.

use crate::core::queue::PopOutcome;
use crate::registry::Registry;

/// Which end of the queue a push/pop command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Head,
    Tail,
}

/// A fully parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push {
        name: Vec<u8>,
        payload: Vec<u8>,
        side: Side,
    },
    Pop {
        name: Vec<u8>,
        side: Side,
    },
    Count {
        name: Vec<u8>,
    },
    /// A syntactically well-formed line whose keyword isn't recognized.
    /// Answered with `ERR` without closing the connection.
    Unrecognized,
}

/// Dispatch a parsed command against the registry, producing the
/// response bytes to write back on the connection.
pub fn dispatch(cmd: Command, registry: &Registry) -> Vec<u8> {
    match cmd {
        Command::Push { name, payload, side } => {
            let queue = registry.get_or_create(&name);
            let result = match side {
                Side::Tail => queue.rpush(&payload),
                Side::Head => queue.lpush(&payload),
            };
            match result {
                Ok(_) => b"OK\n".to_vec(),
                Err(_) => b"FAIL\n".to_vec(),
            }
        }
        Command::Pop { name, side } => {
            let outcome = match registry.lookup(&name) {
                Some(queue) => match side {
                    Side::Tail => queue.rpop(),
                    Side::Head => queue.lpop(),
                },
                None => PopOutcome::Empty,
            };
            match outcome {
                PopOutcome::Value(payload) => {
                    let mut resp = format!("VALUE {}\n", payload.len()).into_bytes();
                    resp.extend_from_slice(&payload);
                    resp.push(b'\n');
                    resp
                }
                PopOutcome::Empty => b"EMPTY\n".to_vec(),
            }
        }
        Command::Count { name } => format!("{}\n", registry.count(&name)).into_bytes(),
        Command::Unrecognized => b"ERR\n".to_vec(),
    }
}
