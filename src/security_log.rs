//! Security event logging for the operator.
//!
//! Structured events about listeners, connections, and captured attempts.
//! All events use `target: "security"` so they can be filtered:
//!
//! ```bash
//! RUST_LOG=security=info sshsnare -p 22,2222
//! ```
//!
//! Submitted passwords never appear here; they only go to the output file.

use std::net::SocketAddr;

use tracing::{debug, error, info};

/// Log a listener that is ready to accept connections.
pub fn log_listener_bound(addr: SocketAddr) {
    info!(
        target: "security",
        event = "listener_bound",
        port = addr.port(),
        addr = %addr,
        "Server listening on port {}",
        addr.port()
    );
}

/// Log a port that could not be bound.
pub fn log_bind_failure(addr: SocketAddr, reason: &str) {
    error!(
        target: "security",
        event = "bind_failure",
        port = addr.port(),
        addr = %addr,
        reason = %reason,
        "Cannot bind to port {}",
        addr.port()
    );
}

/// Log an accepted TCP connection.
pub fn log_connection_accepted(peer: SocketAddr, local: SocketAddr) {
    debug!(
        target: "security",
        event = "connection_accepted",
        peer = %peer,
        port = local.port(),
        "Accepted connection"
    );
}

/// Log an accept call that failed; the listener keeps running.
pub fn log_accept_failure(local: SocketAddr, reason: &str) {
    error!(
        target: "security",
        event = "accept_failure",
        port = local.port(),
        reason = %reason,
        "Cannot accept connection"
    );
}

/// Log a password attempt that was recorded and rejected.
pub fn log_credentials_captured(remote_host: &str, local_port: &str, username: &str) {
    info!(
        target: "security",
        event = "credentials_captured",
        remote_host = %remote_host,
        port = %local_port,
        username = %username,
        "Password attempt captured and rejected"
    );
}

/// Log the end of a connection.
pub fn log_connection_closed(peer: &str, reason: Option<&str>) {
    match reason {
        Some(reason) => debug!(
            target: "security",
            event = "connection_closed",
            peer = %peer,
            reason = %reason,
            "Connection closed with error"
        ),
        None => debug!(
            target: "security",
            event = "connection_closed",
            peer = %peer,
            "Connection closed"
        ),
    }
}
