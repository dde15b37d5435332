//! Host/port splitting for transport addresses.
//!
//! Accepts the two shapes a socket address is printed in:
//!
//! - `host:port` (IPv4 or hostname)
//! - `[host]:port` (IPv6, optionally with a `%scope` suffix inside the brackets)
//!
//! The result only decorates log output, so neither half is checked for being
//! a real address or number.
//!
//! Unbracketed input is split at the FIRST colon and the port is everything
//! after it, so `fe80::1:22` yields host `fe80` and port `:1:22`. An IPv6
//! address must be bracketed to be split sensibly.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("missing ':' between host and port in '{0}'")]
    MissingSeparator(String),
    #[error("unterminated '[' in '{0}'")]
    UnterminatedBracket(String),
    #[error("expected ':' after ']' in '{0}'")]
    MissingBracketSeparator(String),
}

/// Host and port halves of a transport address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    PlainHost,
    BracketHost,
    AfterBracket,
    Port,
}

/// Split a raw `host:port` or `[host]:port` string.
pub fn parse_host_port(addr: &str) -> Result<HostPort, AddressError> {
    let mut state = State::Start;
    let mut host_end = 0;
    let mut port_start = addr.len();

    for (idx, ch) in addr.char_indices() {
        state = match (state, ch) {
            (State::Start, '[') => State::BracketHost,
            (State::Start, ':') => {
                host_end = idx;
                port_start = idx + 1;
                State::Port
            }
            (State::Start, _) => State::PlainHost,
            (State::PlainHost, ':') => {
                host_end = idx;
                port_start = idx + 1;
                State::Port
            }
            (State::PlainHost, _) => State::PlainHost,
            (State::BracketHost, ']') => {
                host_end = idx;
                State::AfterBracket
            }
            (State::BracketHost, _) => State::BracketHost,
            (State::AfterBracket, ':') => {
                port_start = idx + 1;
                State::Port
            }
            (State::AfterBracket, _) => {
                return Err(AddressError::MissingBracketSeparator(addr.to_string()));
            }
            // Everything after the separator belongs to the port
            (State::Port, _) => break,
        };
    }

    match state {
        State::Start => Err(AddressError::Empty),
        State::PlainHost => Err(AddressError::MissingSeparator(addr.to_string())),
        State::BracketHost => Err(AddressError::UnterminatedBracket(addr.to_string())),
        State::AfterBracket => Err(AddressError::MissingBracketSeparator(addr.to_string())),
        State::Port => {
            let host_start = if addr.starts_with('[') { 1 } else { 0 };
            Ok(HostPort {
                host: addr[host_start..host_end].to_string(),
                port: addr[port_start..].to_string(),
            })
        }
    }
}
