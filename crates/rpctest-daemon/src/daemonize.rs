//! Detaching from the controlling terminal.

use std::fs::OpenOptions;
use std::os::fd::AsRawFd;

use fork::Fork;
use nix::unistd::dup2;
use tracing::info;

use crate::error::LaunchError;

/// Moves the process into the background.
pub trait Daemonizer {
    /// Detach and report the pid of the process that carries on.
    ///
    /// Only one process returns from a successful call; the original one
    /// exits.
    fn detach(&mut self) -> Result<u32, LaunchError>;
}

/// Double-fork daemonizer.
///
/// Keeps the working directory and points stdin, stdout and stderr at
/// `/dev/null`. Must be called before any async runtime is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForkDaemonizer;

impl Daemonizer for ForkDaemonizer {
    fn detach(&mut self) -> Result<u32, LaunchError> {
        match fork::daemon(true, true) {
            Ok(Fork::Parent(_)) => std::process::exit(0),
            Ok(Fork::Child) => {
                let pid = std::process::id();
                info!(pid, "detached");
                redirect_stdio()?;
                Ok(pid)
            }
            Err(e) => Err(LaunchError::Daemonize(format!("fork failed: {e}"))),
        }
    }
}

fn redirect_stdio() -> Result<(), LaunchError> {
    let devnull = OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/null")
        .map_err(|e| LaunchError::Daemonize(format!("cannot open /dev/null: {e}")))?;

    for fd in 0..=2 {
        dup2(devnull.as_raw_fd(), fd)
            .map_err(|e| LaunchError::Daemonize(format!("cannot redirect fd {fd}: {e}")))?;
    }
    Ok(())
}
