//! Common test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

use sshsnare::config::Settings;

/// Path to the checked-in test host key
pub fn host_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/keys/host_ed25519")
}

/// Test environment with an isolated output directory
pub struct TestEnvironment {
    pub dir: TempDir,
    pub output_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output_path = dir.path().join("credentials.log");
        Self { dir, output_path }
    }

    /// Settings bound to loopback with the test key and this environment's output
    pub fn settings(&self, ports: &str) -> Settings {
        Settings {
            host_key: host_key_path(),
            ports: ports.to_string(),
            output: self.output_path.clone(),
            listen: "127.0.0.1".parse().expect("valid address"),
            ..Default::default()
        }
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
