//! sshsnare library
//!
//! An SSH honeypot: listens on any number of ports, lets clients reach the
//! authentication phase, appends every username/password pair to a flat
//! file, and rejects every attempt.

pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod logging;
pub mod security_log;
pub mod ssh;
pub mod validation;
