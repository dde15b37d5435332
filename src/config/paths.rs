use std::path::PathBuf;

/// Conventional location of the system's RSA host key.
pub const DEFAULT_HOST_KEY: &str = "/etc/ssh/ssh_host_rsa_key";

/// Output that discards everything.
#[cfg(not(windows))]
pub const DEFAULT_OUTPUT: &str = "/dev/null";
#[cfg(windows)]
pub const DEFAULT_OUTPUT: &str = "NUL";

/// File name of the diagnostics log inside `--log-dir`.
pub const DIAGNOSTICS_FILE: &str = "sshsnare.log";

pub fn default_host_key() -> PathBuf {
    PathBuf::from(DEFAULT_HOST_KEY)
}

pub fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

/// Expand tilde in path (e.g., ~/keys/host -> /home/user/keys/host)
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
