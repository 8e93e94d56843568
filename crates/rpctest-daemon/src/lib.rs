//! Launcher lifecycle for rpctest services.
//!
//! Implements the startup sequence of a test service daemon: singleton
//! enforcement through a pidfile, registration of the service across the
//! requested nettypes, detaching into the background, and handing control
//! to the serve loop. Kill mode signals the instance a pidfile names.

pub mod config;
pub mod controller;
pub mod daemonize;
pub mod error;
pub mod pidfile;
pub mod setup;
pub mod state;

pub use config::{LaunchConfig, ServiceConfig};
pub use controller::Controller;
pub use daemonize::{Daemonizer, ForkDaemonizer};
pub use error::{LaunchError, PidfileError};
pub use pidfile::Pidfile;
pub use state::LaunchState;

/// Name the launched service reports itself as in diagnostics.
pub const SERVICE_NAME: &str = "rpc.squared";
