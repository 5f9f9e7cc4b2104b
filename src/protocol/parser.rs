//! Stateful, incremental command parser.
//!
//! Mirrors the read/parse/big-data loop in the original `togo_server.c`:
//! the worker feeds it whatever bytes a read produced, and the parser
//! either returns a complete [`Command`], reports it needs more bytes
//! (the worker keeps reading), or flags a violation (the worker closes
//! the connection). Consumed bytes are drained from the front of the
//! caller's buffer as they're recognized. The parser doesn't rescan
//! bytes it has already accounted for, even across the multi-read
//! "big data mode" span.

use thiserror::Error;

use super::command::{Command, Side};

enum State {
    Line,
    BigData {
        side: Side,
        name: Vec<u8>,
        len: usize,
    },
}

/// Result of one [`Parser::parse`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseStep {
    /// A full command was parsed; the consumed bytes were drained from
    /// the input buffer.
    Command(Command),
    /// Not enough bytes yet; the worker should read more and retry.
    NeedMoreData,
}

pub struct Parser {
    state: State,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self { state: State::Line }
    }

    /// Whether the parser is mid-payload-stream (big data mode). The
    /// worker uses this to decide whether to keep appending straight
    /// into the receive buffer rather than treating a full buffer as a
    /// protocol violation.
    pub fn in_big_data_mode(&self) -> bool {
        matches!(self.state, State::BigData { .. })
    }

    /// Try to parse one command out of `buf`, consuming recognized
    /// prefix bytes. Returns `NeedMoreData` without consuming anything
    /// if `buf` doesn't yet hold a full command.
    pub fn parse(&mut self, buf: &mut Vec<u8>) -> Result<ParseStep, ProtocolError> {
        let pending_len = match &self.state {
            State::Line => None,
            State::BigData { len, .. } => Some(*len),
        };

        match pending_len {
            None => match self.parse_line(buf)? {
                Some(step) => Ok(step),
                None => Ok(ParseStep::NeedMoreData),
            },
            Some(len) => {
                let need = len + 1; // payload + trailing '\n'
                if buf.len() < need {
                    return Ok(ParseStep::NeedMoreData);
                }
                self.finish_big_data(buf)
            }
        }
    }

    fn parse_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<ParseStep>, ProtocolError> {
        let newline_pos = match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let line: Vec<u8> = buf.drain(0..=newline_pos).collect();
        let line = &line[..line.len() - 1]; // drop the '\n'
        let line = strip_trailing_cr(line);

        let mut tokens = line.split(|&b| b == b' ').filter(|t| !t.is_empty());
        let keyword = tokens.next().unwrap_or(b"");

        let step = match keyword {
            b"QUEUE_RPUSH" | b"QUEUE_LPUSH" => {
                let side = if keyword == b"QUEUE_RPUSH" {
                    Side::Tail
                } else {
                    Side::Head
                };
                let name = tokens.next().ok_or(ProtocolError::Malformed)?.to_vec();
                let len_str = tokens.next().ok_or(ProtocolError::Malformed)?;
                if tokens.next().is_some() {
                    return Err(ProtocolError::Malformed);
                }
                let len: usize = std::str::from_utf8(len_str)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ProtocolError::Malformed)?;

                self.state = State::BigData { side, name, len };
                return self.parse(buf).map(Some);
            }
            b"QUEUE_RPOP" | b"QUEUE_LPOP" => {
                let side = if keyword == b"QUEUE_RPOP" {
                    Side::Tail
                } else {
                    Side::Head
                };
                let name = tokens.next().ok_or(ProtocolError::Malformed)?.to_vec();
                if tokens.next().is_some() {
                    return Err(ProtocolError::Malformed);
                }
                ParseStep::Command(Command::Pop { name, side })
            }
            b"QUEUE_COUNT" => {
                let name = tokens.next().ok_or(ProtocolError::Malformed)?.to_vec();
                if tokens.next().is_some() {
                    return Err(ProtocolError::Malformed);
                }
                ParseStep::Command(Command::Count { name })
            }
            b"" => return Err(ProtocolError::Malformed),
            _ => ParseStep::Command(Command::Unrecognized),
        };

        Ok(Some(step))
    }

    fn finish_big_data(&mut self, buf: &mut Vec<u8>) -> Result<ParseStep, ProtocolError> {
        let (side, name, len) = match std::mem::replace(&mut self.state, State::Line) {
            State::BigData { side, name, len } => (side, name, len),
            State::Line => unreachable!("finish_big_data called outside big-data state"),
        };

        let payload: Vec<u8> = buf.drain(0..len).collect();
        if buf.first() != Some(&b'\n') {
            return Err(ProtocolError::Malformed);
        }
        buf.drain(0..1);

        Ok(ParseStep::Command(Command::Push { name, payload, side }))
    }
}

fn strip_trailing_cr(line: &[u8]) -> &[u8] {
    if line.last() == Some(&b'\r') {
        &line[..line.len() - 1]
    } else {
        line
    }
}

/// Parse-level protocol violations. The worker closes the connection on
/// any of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed command")]
    Malformed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &[u8]) -> Vec<Command> {
        let mut buf = input.to_vec();
        let mut parser = Parser::new();
        let mut out = Vec::new();
        loop {
            match parser.parse(&mut buf).unwrap() {
                ParseStep::Command(cmd) => out.push(cmd),
                ParseStep::NeedMoreData => break,
            }
        }
        out
    }

    #[test]
    fn parses_rpush() {
        let cmds = parse_all(b"QUEUE_RPUSH q 3\nabc\n");
        assert_eq!(
            cmds,
            vec![Command::Push {
                name: b"q".to_vec(),
                payload: b"abc".to_vec(),
                side: Side::Tail,
            }]
        );
    }

    #[test]
    fn parses_lpop_and_count() {
        let cmds = parse_all(b"QUEUE_LPOP q\nQUEUE_COUNT q\n");
        assert_eq!(
            cmds,
            vec![
                Command::Pop {
                    name: b"q".to_vec(),
                    side: Side::Head,
                },
                Command::Count { name: b"q".to_vec() },
            ]
        );
    }

    #[test]
    fn payload_may_contain_newlines() {
        let cmds = parse_all(b"QUEUE_RPUSH q 3\na\nc\n");
        assert_eq!(
            cmds,
            vec![Command::Push {
                name: b"q".to_vec(),
                payload: b"a\nc".to_vec(),
                side: Side::Tail,
            }]
        );
    }

    #[test]
    fn incomplete_push_payload_reports_need_more_data() {
        let mut buf = b"QUEUE_RPUSH q 5\nab".to_vec();
        let mut parser = Parser::new();
        assert!(matches!(
            parser.parse(&mut buf).unwrap(),
            ParseStep::NeedMoreData
        ));
        assert!(parser.in_big_data_mode());
        buf.extend_from_slice(b"cde\n");
        match parser.parse(&mut buf).unwrap() {
            ParseStep::Command(Command::Push { payload, .. }) => assert_eq!(payload, b"abcde"),
            other => panic!("expected a completed push, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_keyword_yields_unrecognized_command() {
        let cmds = parse_all(b"QUEUE_FROB q\n");
        assert_eq!(cmds, vec![Command::Unrecognized]);
    }

    #[test]
    fn missing_trailing_newline_after_payload_is_a_violation() {
        let mut buf = b"QUEUE_RPUSH q 3\nabcX".to_vec();
        let mut parser = Parser::new();
        assert_eq!(parser.parse(&mut buf), Err(ProtocolError::Malformed));
    }

    #[test]
    fn malformed_length_is_a_violation() {
        let mut buf = b"QUEUE_RPUSH q notanumber\n".to_vec();
        let mut parser = Parser::new();
        assert_eq!(parser.parse(&mut buf), Err(ProtocolError::Malformed));
    }
}

