//! SSH server side of the honeypot.
//!
//! Binds listeners, runs handshakes, and intercepts password authentication.
//! Key exchange and transport are handled by `russh`.

pub mod address;
pub mod handler;
pub mod identity;
pub mod limiter;
pub mod server;

pub use handler::CredentialInterceptor;
pub use identity::{ServerIdentity, load_host_key};
pub use limiter::ConnectionLimiter;
pub use server::{BindOutcome, ProtocolOptions, ServerContext, run_listener};
