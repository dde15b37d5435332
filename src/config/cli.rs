use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::paths;
use super::settings::{DEFAULT_SERVER_ID, Settings};

/// sshsnare: an SSH honeypot that records every password it is offered
#[derive(Parser, Debug)]
#[command(name = "sshsnare", version)]
#[command(about = "Accepts SSH connections, logs every password attempt, and rejects it")]
pub struct Cli {
    /// Host key file path
    #[arg(short = 'k', long = "host-key", default_value = paths::DEFAULT_HOST_KEY)]
    pub host_key: String,

    /// Comma separated ports list
    #[arg(short = 'p', long = "ports", default_value = "22")]
    pub ports: String,

    /// File where captured credentials are appended
    #[arg(short = 'f', long = "output", default_value = paths::DEFAULT_OUTPUT)]
    pub output: String,

    /// Address to bind on every port
    #[arg(short = 'l', long = "listen", default_value = "::")]
    pub listen: IpAddr,

    /// Maximum connections handled at once (unbounded when omitted)
    #[arg(long = "max-connections")]
    pub max_connections: Option<usize>,

    /// Captured records that may queue for the writer before handshakes wait
    #[arg(long = "queue-capacity", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub queue_capacity: u32,

    /// SSH identification string sent to clients
    #[arg(long = "server-id", default_value = DEFAULT_SERVER_ID)]
    pub server_id: String,

    /// Delay before each authentication rejection, in milliseconds
    #[arg(long = "reject-delay-ms", default_value_t = 0)]
    pub reject_delay_ms: u64,

    /// Directory for the diagnostics log file
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            host_key: paths::expand_tilde(&cli.host_key),
            ports: cli.ports,
            output: paths::expand_tilde(&cli.output),
            listen: cli.listen,
            max_connections: cli.max_connections,
            queue_capacity: cli.queue_capacity as usize,
            server_id: cli.server_id,
            reject_delay: Duration::from_millis(cli.reject_delay_ms),
            log_dir: cli.log_dir,
        }
    }
}
