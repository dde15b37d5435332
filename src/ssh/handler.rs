use std::future::Future;

use russh::keys::PublicKey;
use russh::server::{Auth, Handler, Response};
use tokio::sync::mpsc;

use crate::capture::CredentialRecord;
use crate::error::SshError;
use crate::security_log;

/// Authentication hook installed on every connection.
///
/// Each password attempt becomes a [`CredentialRecord`] on the shared record
/// stream and is then rejected. No attempt ever succeeds, so no channel or
/// session request is ever reachable.
pub struct CredentialInterceptor {
    remote_addr: String,
    local_addr: String,
    /// Shared stream to the output writer
    records: mpsc::Sender<CredentialRecord>,
}

impl CredentialInterceptor {
    /// `remote_addr` and `local_addr` are the transport addresses as printed
    /// by the socket (`host:port` or `[host]:port`).
    pub fn new(
        remote_addr: String,
        local_addr: String,
        records: mpsc::Sender<CredentialRecord>,
    ) -> Self {
        Self {
            remote_addr,
            local_addr,
            records,
        }
    }

    /// Record one password attempt and return the rejection.
    ///
    /// Waits while the writer is behind, which bounds the number of records
    /// in flight.
    pub async fn capture(&self, user: &str, password: &str) -> Auth {
        let record =
            CredentialRecord::from_addresses(&self.remote_addr, &self.local_addr, user, password);
        security_log::log_credentials_captured(
            &record.remote_host,
            &record.local_port,
            &record.username,
        );

        if self.records.send(record).await.is_err() {
            tracing::error!(
                "Dropping attempt from {}: {}",
                self.remote_addr,
                SshError::RecordStreamClosed
            );
        }

        reject()
    }
}

fn reject() -> Auth {
    Auth::Reject {
        proceed_with_methods: None,
        partial_success: false,
    }
}

impl Handler for CredentialInterceptor {
    type Error = SshError;

    fn auth_none(&mut self, _user: &str) -> impl Future<Output = Result<Auth, Self::Error>> + Send {
        async { Ok(reject()) }
    }

    fn auth_password(
        &mut self,
        user: &str,
        password: &str,
    ) -> impl Future<Output = Result<Auth, Self::Error>> + Send {
        let user = user.to_string();
        let password = password.to_string();

        async move { Ok(self.capture(&user, &password).await) }
    }

    fn auth_publickey_offered(
        &mut self,
        user: &str,
        _public_key: &PublicKey,
    ) -> impl Future<Output = Result<Auth, Self::Error>> + Send {
        tracing::debug!("Refusing public key offered for {} by {}", user, self.remote_addr);
        async { Ok(reject()) }
    }

    fn auth_publickey(
        &mut self,
        _user: &str,
        _public_key: &PublicKey,
    ) -> impl Future<Output = Result<Auth, Self::Error>> + Send {
        async { Ok(reject()) }
    }

    // Never prompts, so no responses ever arrive to record
    fn auth_keyboard_interactive<'a>(
        &'a mut self,
        _user: &str,
        _submethods: &str,
        _response: Option<Response<'a>>,
    ) -> impl Future<Output = Result<Auth, Self::Error>> + Send {
        async { Ok(reject()) }
    }
}
