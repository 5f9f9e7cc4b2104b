//! Wire framing and command dispatch.
//!
//! spec.md treats the parser as an external collaborator and only fixes
//! the logical command table; this module supplies one concrete,
//! working framing grounded on the read/parse loop of the original
//! `togo_server.c` (line-based commands, with a "big data" continuation
//! mode for streaming payload bytes).

pub mod command;
pub mod parser;

pub use command::{dispatch, Command, Side};
pub use parser::{ParseStep, Parser, ProtocolError};
