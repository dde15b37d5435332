//! Startup sequencing and the main serve loop.
//!
//! Order matters: ports are validated, the host key is loaded, and the
//! output file is opened before any socket is bound. Each failure has its own
//! exit status (see [`StartupError::exit_code`]).

use std::net::{IpAddr, SocketAddr};

use tokio::sync::oneshot;

use crate::capture::{RecordWriter, open_output, record_channel};
use crate::config::Settings;
use crate::error::StartupError;
use crate::ssh::{
    BindOutcome, ConnectionLimiter, ServerContext, ServerIdentity, load_host_key, run_listener,
};
use crate::validation::{PortSpec, validate_port_list};

/// Inputs checked before anything is bound.
#[derive(Debug)]
pub struct Prepared {
    pub ports: PortSpec,
    pub identity: ServerIdentity,
    pub output: tokio::fs::File,
}

/// Validate the port list, load the host key, and open the output file.
pub async fn prepare(settings: &Settings) -> Result<Prepared, StartupError> {
    let ports = validate_port_list(&settings.ports)?;

    let identity = load_host_key(&settings.host_key).map_err(|source| StartupError::HostKey {
        path: settings.host_key.clone(),
        source,
    })?;

    let output = open_output(&settings.output)
        .await
        .map_err(|source| StartupError::OutputFile {
            path: settings.output.clone(),
            source,
        })?;

    Ok(Prepared {
        ports,
        identity,
        output,
    })
}

/// Overall result of binding every configured port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStatus {
    AllBound,
    Partial,
    NoneBound,
}

/// Classify `bound` successes out of `bound + failed` attempts.
pub fn classify(bound: usize, failed: usize) -> BindStatus {
    match (bound, failed) {
        (0, _) => BindStatus::NoneBound,
        (_, 0) => BindStatus::AllBound,
        _ => BindStatus::Partial,
    }
}

/// Bind outcomes collected during startup, in port-list order.
#[derive(Debug, Default)]
pub struct BindSummary {
    pub bound: Vec<SocketAddr>,
    pub failed: Vec<(SocketAddr, std::io::Error)>,
}

impl BindSummary {
    pub fn record(&mut self, requested: SocketAddr, outcome: BindOutcome) {
        match outcome {
            Ok(local) => self.bound.push(local),
            Err(e) => self.failed.push((requested, e)),
        }
    }

    pub fn status(&self) -> BindStatus {
        classify(self.bound.len(), self.failed.len())
    }

    pub fn ensure_any_bound(&self) -> Result<(), StartupError> {
        match self.status() {
            BindStatus::NoneBound => Err(StartupError::NoListenerBound),
            _ => Ok(()),
        }
    }
}

/// Start one listener task per port and wait for each to report its bind.
///
/// Ports are bound one after another, so a duplicate port always fails on
/// its second occurrence. Listeners that bound keep running after this
/// returns.
pub async fn start_listeners(ip: IpAddr, ports: &[u16], context: &ServerContext) -> BindSummary {
    let mut summary = BindSummary::default();

    for &port in ports {
        let addr = SocketAddr::new(ip, port);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        tokio::spawn(run_listener(addr, context.clone(), outcome_tx));

        let outcome = outcome_rx.await.unwrap_or_else(|_| {
            Err(std::io::Error::other(
                "listener task ended before reporting",
            ))
        });
        summary.record(addr, outcome);
    }

    summary
}

/// Run the honeypot until the process is terminated.
///
/// Returns only on a startup failure, or with the number of records written
/// if the record stream ever closes.
pub async fn run(settings: Settings) -> Result<u64, StartupError> {
    let prepared = prepare(&settings).await?;
    tracing::info!(
        "Loaded {} host key {} ({})",
        prepared.identity.algorithm(),
        settings.host_key.display(),
        prepared.identity.fingerprint()
    );

    let (records_tx, records_rx) = record_channel(settings.queue_capacity);
    let limiter = ConnectionLimiter::from_option(settings.max_connections);
    if let Some(max) = settings.max_connections {
        tracing::info!("Handling at most {} connections at once", max);
    }

    let context = ServerContext::new(
        prepared.identity,
        &settings.protocol_options(),
        records_tx,
        limiter,
    );
    let summary = start_listeners(settings.listen, prepared.ports.ports(), &context).await;
    // Listener tasks hold their own clones
    drop(context);

    summary.ensure_any_bound()?;
    if summary.status() == BindStatus::Partial {
        tracing::warn!(
            "Warning : some servers are not bound to port ({} of {} failed)",
            summary.failed.len(),
            prepared.ports.ports().len()
        );
    }

    tracing::info!("Appending captured credentials to {}", settings.output.display());
    let mut writer = RecordWriter::new(prepared.output);
    Ok(writer.run(records_rx).await)
}
