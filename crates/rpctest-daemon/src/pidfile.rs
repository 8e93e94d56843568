//! Pidfile handling: liveness checks, writes, and kill mode.
//!
//! The file holds a single decimal pid followed by a newline. Checking and
//! writing are separate steps with no lock in between, so two launches
//! racing on the same path can both pass the check.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, info, warn};

use crate::error::PidfileError;

/// A pidfile at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pidfile {
    path: PathBuf,
}

impl Pidfile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded pid.
    pub fn read_pid(&self) -> Result<u32, PidfileError> {
        let content = fs::read_to_string(&self.path).map_err(PidfileError::Read)?;
        parse_pid(&content)
    }

    /// The recorded pid, if the process it names is still alive.
    ///
    /// A missing, unreadable or malformed pidfile names no live process.
    pub fn running_pid(&self) -> Option<u32> {
        match self.read_pid() {
            Ok(pid) if process_alive(pid) => Some(pid),
            Ok(pid) => {
                debug!(pid, path = %self.path.display(), "pidfile names a dead process");
                None
            }
            Err(e) => {
                debug!(error = %e, path = %self.path.display(), "no usable pidfile");
                None
            }
        }
    }

    /// Record `pid`, replacing any previous content.
    pub fn write(&self, pid: u32) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(&self.path)?;
        writeln!(file, "{pid}")?;
        file.sync_all()?;
        info!(pid, path = %self.path.display(), "pidfile written");
        Ok(())
    }

    /// Send `SIGTERM` to the recorded process and remove the pidfile.
    ///
    /// Returns the pid that was signalled.
    pub fn kill(&self) -> Result<u32, PidfileError> {
        let pid = self.read_pid()?;
        kill(to_nix_pid(pid)?, Signal::SIGTERM).map_err(|errno| PidfileError::Signal { pid, errno })?;
        info!(pid, "sent SIGTERM");

        if let Err(e) = fs::remove_file(&self.path) {
            warn!(error = %e, path = %self.path.display(), "failed to remove pidfile");
        }
        Ok(pid)
    }
}

fn parse_pid(content: &str) -> Result<u32, PidfileError> {
    let trimmed = content.trim();
    let pid = trimmed
        .parse::<u32>()
        .map_err(|_| PidfileError::Invalid(trimmed.to_string()))?;
    to_nix_pid(pid)?;
    Ok(pid)
}

/// Pids that would address a process group instead of a process are
/// rejected.
fn to_nix_pid(pid: u32) -> Result<Pid, PidfileError> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
        _ => Err(PidfileError::Invalid(pid.to_string())),
    }
}

/// Check if a process with the given pid exists.
///
/// `kill(pid, 0)` probes without delivering a signal; `EPERM` means the
/// process exists but belongs to someone else.
pub fn process_alive(pid: u32) -> bool {
    let Ok(pid) = to_nix_pid(pid) else {
        return false;
    };
    match kill(pid, None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
