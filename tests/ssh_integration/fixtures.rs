//! In-process honeypot fixtures

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh::client;
use russh::keys::PublicKey;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

use sshsnare::app::{self, BindSummary};
use sshsnare::capture::{RecordWriter, open_output, record_channel};
use sshsnare::ssh::{ConnectionLimiter, ProtocolOptions, ServerContext, load_host_key};

pub const TEST_SERVER_ID: &str = "SSH-2.0-OpenSSH_9.6p1 Debian-4";

/// A running honeypot writing to a temporary output file
pub struct Honeypot {
    pub dir: TempDir,
    pub output_path: PathBuf,
    pub summary: BindSummary,
}

impl Honeypot {
    /// Bind one loopback listener per entry of `ports` (0 picks a free port)
    pub async fn start(ports: &[u16]) -> Self {
        Self::start_with(ports, ConnectionLimiter::unbounded()).await
    }

    pub async fn start_with(ports: &[u16], limiter: ConnectionLimiter) -> Self {
        Self::start_on("127.0.0.1".parse().expect("valid address"), ports, limiter).await
    }

    /// Bind every port on `listen` instead of loopback
    pub async fn start_on(listen: IpAddr, ports: &[u16], limiter: ConnectionLimiter) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output_path = dir.path().join("credentials.log");

        let key_path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/keys/host_ed25519");
        let identity = load_host_key(&key_path).expect("test host key loads");
        let options = ProtocolOptions {
            server_id: TEST_SERVER_ID.to_string(),
            reject_delay: Duration::ZERO,
        };

        let (records_tx, records_rx) = record_channel(1);
        let context = ServerContext::new(identity, &options, records_tx, limiter);
        let summary = app::start_listeners(listen, ports, &context).await;

        let output = open_output(&output_path).await.expect("output opens");
        tokio::spawn(async move {
            RecordWriter::new(output).run(records_rx).await;
        });

        Self {
            dir,
            output_path,
            summary,
        }
    }

    /// First successfully bound address
    pub fn addr(&self) -> SocketAddr {
        self.summary.bound[0]
    }

    /// Wait until the output holds at least `count` lines and return them
    pub async fn wait_for_lines(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let content = tokio::fs::read_to_string(&self.output_path)
                .await
                .unwrap_or_default();
            let lines: Vec<String> = content.lines().map(str::to_string).collect();
            if lines.len() >= count {
                return lines;
            }
            sleep(Duration::from_millis(50)).await;
        }
        panic!("output never reached {} lines", count);
    }

    /// Current output lines without waiting
    pub async fn lines(&self) -> Vec<String> {
        tokio::fs::read_to_string(&self.output_path)
            .await
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Client handler that trusts any host key
pub struct TrustingClient;

impl client::Handler for TrustingClient {
    type Error = russh::Error;

    fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        async { Ok(true) }
    }
}

/// Open an SSH connection to the honeypot
pub async fn connect(addr: SocketAddr) -> client::Handle<TrustingClient> {
    let config = Arc::new(client::Config::default());
    timeout(
        Duration::from_secs(10),
        client::connect(config, addr, TrustingClient),
    )
    .await
    .expect("connect timed out")
    .expect("handshake reaches authentication")
}

/// Try each password in turn on one connection; returns whether any succeeded
pub async fn try_passwords(addr: SocketAddr, user: &str, passwords: &[&str]) -> bool {
    let mut handle = connect(addr).await;
    let mut any_success = false;
    for password in passwords {
        let result = handle
            .authenticate_password(user, *password)
            .await
            .expect("authentication request completes");
        any_success |= result.success();
    }
    any_success
}
