use std::borrow::Cow;
use std::fmt;

use crate::ssh::address::{HostPort, parse_host_port};

/// Separator between fields of one output line.
pub const FIELD_SEPARATOR: &str = "#;#";

/// One captured password attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub remote_host: String,
    pub local_host: String,
    pub local_port: String,
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    /// Build a record from the raw transport addresses of the connection.
    ///
    /// An address that cannot be split is kept whole as the host, with an
    /// empty port, so the attempt is still recorded.
    pub fn from_addresses(remote: &str, local: &str, username: &str, password: &str) -> Self {
        let remote = split_or_raw(remote);
        let local = split_or_raw(local);

        Self {
            remote_host: remote.host,
            local_host: local.host,
            local_port: local.port,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// The output line for this record, without the trailing newline.
    ///
    /// Backslash, CR and LF inside a field are written as `\\`, `\r` and
    /// `\n`, so one record is always exactly one line and the original
    /// value can be recovered.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            escape_field(&self.remote_host),
            escape_field(&self.local_host),
            escape_field(&self.local_port),
            escape_field(&self.username),
            escape_field(&self.password),
            sep = FIELD_SEPARATOR
        )
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains(['\\', '\r', '\n']) {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn split_or_raw(addr: &str) -> HostPort {
    parse_host_port(addr).unwrap_or_else(|e| {
        tracing::debug!("Keeping unparsed address {:?}: {}", addr, e);
        HostPort {
            host: addr.to_string(),
            port: String::new(),
        }
    })
}
