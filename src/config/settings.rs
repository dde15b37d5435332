use std::net::{IpAddr, Ipv6Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::ssh::ProtocolOptions;

use super::paths;

/// Identification string sent to clients unless overridden.
pub const DEFAULT_SERVER_ID: &str = "SSH-2.0-OpenSSH_8.9p1 Ubuntu-3ubuntu0.10";

/// Runtime settings for one honeypot process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Private key presented as the host identity
    pub host_key: PathBuf,
    /// Comma-separated port list, validated at startup
    pub ports: String,
    /// Append-only credential output
    pub output: PathBuf,
    /// Address bound on every port
    pub listen: IpAddr,
    /// Concurrent connection cap; `None` means unbounded
    pub max_connections: Option<usize>,
    /// Records that may wait for the writer before producers block
    pub queue_capacity: usize,
    pub server_id: String,
    pub reject_delay: Duration,
    /// Directory for the diagnostics log; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host_key: paths::default_host_key(),
            ports: "22".to_string(),
            output: paths::default_output(),
            listen: IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            max_connections: None,
            queue_capacity: 1,
            server_id: DEFAULT_SERVER_ID.to_string(),
            reject_delay: Duration::ZERO,
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn protocol_options(&self) -> ProtocolOptions {
        ProtocolOptions {
            server_id: self.server_id.clone(),
            reject_delay: self.reject_delay,
        }
    }
}
