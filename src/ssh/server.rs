//! Listening sockets and per-connection handshakes.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use russh::server::Config;
use russh::{MethodKind, MethodSet, SshId};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, mpsc, oneshot};

use crate::capture::CredentialRecord;
use crate::security_log;

use super::handler::CredentialInterceptor;
use super::identity::ServerIdentity;
use super::limiter::ConnectionLimiter;

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Result of binding one listener: the bound address, or why it failed.
pub type BindOutcome = io::Result<SocketAddr>;

/// Protocol options applied to every handshake.
#[derive(Debug, Clone)]
pub struct ProtocolOptions {
    /// Identification string sent before key exchange.
    pub server_id: String,
    /// Delay applied to each rejected authentication.
    pub reject_delay: Duration,
}

/// Everything a listener needs, built once and cloned into each task.
///
/// Cloning only bumps reference counts; the protocol configuration and host
/// key are never modified after startup.
#[derive(Clone)]
pub struct ServerContext {
    config: Arc<Config>,
    records: mpsc::Sender<CredentialRecord>,
    limiter: ConnectionLimiter,
}

impl ServerContext {
    pub fn new(
        identity: ServerIdentity,
        options: &ProtocolOptions,
        records: mpsc::Sender<CredentialRecord>,
        limiter: ConnectionLimiter,
    ) -> Self {
        Self {
            config: Arc::new(build_russh_config(identity, options)),
            records,
            limiter,
        }
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    fn interceptor(&self, remote_addr: String, local_addr: String) -> CredentialInterceptor {
        CredentialInterceptor::new(remote_addr, local_addr, self.records.clone())
    }
}

/// Build the server configuration: password authentication only and no
/// inactivity timeout, so clients may linger as long as they like.
pub fn build_russh_config(identity: ServerIdentity, options: &ProtocolOptions) -> Config {
    Config {
        server_id: SshId::Standard(options.server_id.clone().into()),
        methods: MethodSet::from(&[MethodKind::Password][..]),
        auth_rejection_time: options.reject_delay,
        auth_rejection_time_initial: Some(Duration::ZERO),
        inactivity_timeout: None,
        keys: vec![identity.into_key()],
        ..Default::default()
    }
}

/// Bind `addr`, report the outcome once on `outcome`, then accept forever.
///
/// A bind failure ends the task after reporting. Accept errors are logged and
/// the loop continues.
pub async fn run_listener(
    addr: SocketAddr,
    context: ServerContext,
    outcome: oneshot::Sender<BindOutcome>,
) {
    let listener = match bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            security_log::log_bind_failure(addr, &e.to_string());
            let _ = outcome.send(Err(e));
            return;
        }
    };

    let local_addr = listener.local_addr().unwrap_or(addr);
    security_log::log_listener_bound(local_addr);
    let _ = outcome.send(Ok(local_addr));

    accept_loop(listener, local_addr, context).await;
}

/// Bind `addr`, retrying on `0.0.0.0` when the wildcard IPv6 address is
/// unusable on this host.
async fn bind(addr: SocketAddr) -> io::Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) => match ipv4_fallback(addr, &e) {
            Some(fallback) => {
                tracing::info!("Cannot bind {} ({}), trying {}", addr, e, fallback);
                TcpListener::bind(fallback).await
            }
            None => Err(e),
        },
    }
}

/// The IPv4 wildcard to try after binding `[::]:port` failed with `err`.
///
/// Port conflicts and permission errors would fail the same way on IPv4, so
/// they get no retry.
pub fn ipv4_fallback(addr: SocketAddr, err: &io::Error) -> Option<SocketAddr> {
    match addr {
        SocketAddr::V6(v6)
            if v6.ip().is_unspecified()
                && !matches!(
                    err.kind(),
                    io::ErrorKind::AddrInUse | io::ErrorKind::PermissionDenied
                ) =>
        {
            Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), v6.port()))
        }
        _ => None,
    }
}

/// Unwrap IPv4-mapped IPv6 addresses (`[::ffff:a.b.c.d]:p`), as reported by
/// dual-stack sockets, into plain IPv4.
pub fn normalize_addr(addr: SocketAddr) -> SocketAddr {
    match addr {
        SocketAddr::V6(v6) => match v6.ip().to_ipv4_mapped() {
            Some(v4) => SocketAddr::new(IpAddr::V4(v4), v6.port()),
            None => addr,
        },
        SocketAddr::V4(_) => addr,
    }
}

async fn accept_loop(listener: TcpListener, local_addr: SocketAddr, context: ServerContext) {
    loop {
        if context.limiter.available() == Some(0) {
            tracing::debug!("Connection limit reached on port {}, waiting", local_addr.port());
        }
        // Waits for a free slot only when a limit is configured
        let permit = context.limiter.acquire().await;

        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                security_log::log_connection_accepted(normalize_addr(peer_addr), local_addr);
                let context = context.clone();
                tokio::spawn(handle_connection(stream, context, permit));
            }
            Err(e) => {
                security_log::log_accept_failure(local_addr, &e.to_string());
                // Out of descriptors and similar errors persist for a while
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
            }
        }
    }
}

/// Run one handshake to completion and release the socket.
///
/// Every outcome is expected: authentication never succeeds, and clients
/// that disconnect or speak garbage simply end the task. The socket is owned
/// by the session and closed when it is dropped.
pub async fn handle_connection(
    stream: TcpStream,
    context: ServerContext,
    _permit: Option<OwnedSemaphorePermit>,
) {
    let (remote_addr, local_addr) = match (stream.peer_addr(), stream.local_addr()) {
        (Ok(remote), Ok(local)) => (
            normalize_addr(remote).to_string(),
            normalize_addr(local).to_string(),
        ),
        (Err(e), _) | (_, Err(e)) => {
            security_log::log_connection_closed("unknown", Some(&e.to_string()));
            return;
        }
    };

    let handler = context.interceptor(remote_addr.clone(), local_addr);
    match russh::server::run_stream(context.config(), stream, handler).await {
        Ok(session) => match session.await {
            Ok(()) => security_log::log_connection_closed(&remote_addr, None),
            Err(e) => security_log::log_connection_closed(&remote_addr, Some(&e.to_string())),
        },
        Err(e) => security_log::log_connection_closed(&remote_addr, Some(&e.to_string())),
    }
}
