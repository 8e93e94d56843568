//! Launcher errors and their exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for every failure except a failed post-detach pidfile rewrite.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code when the pidfile could not be rewritten after detaching.
///
/// The service may already be reachable at this point, so this failure is
/// kept distinguishable from the others.
pub const EXIT_PIDFILE_REWRITE: u8 = 22;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("It appears there's another {} running (pid {pid})", crate::SERVICE_NAME)]
    AlreadyRunning { pid: u32 },

    #[error("Failed to write {}: {source}", .path.display())]
    PidfileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rewrite {} after detaching: {source}", .path.display())]
    PidfileRewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register {program} ({target}): {source}")]
    Registration {
        program: rpctest_types::ProgramId,
        target: String,
        #[source]
        source: rpctest_service::ServiceError,
    },

    #[error("Unable to background process: {0}")]
    Daemonize(String),

    #[error(
        "Failed to send SIGTERM to {} - maybe the process is gone? ({}: {source})",
        crate::SERVICE_NAME,
        .path.display()
    )]
    Kill {
        path: PathBuf,
        #[source]
        source: PidfileError,
    },

    #[error("service loop failed: {0}")]
    Serve(#[source] rpctest_service::ServiceError),

    #[error("service loop returned unexpectedly")]
    ServeReturned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::PidfileRewrite { .. } => EXIT_PIDFILE_REWRITE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Reading or acting on a pidfile failed.
#[derive(Debug, Error)]
pub enum PidfileError {
    #[error("cannot read pidfile: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid pid {0:?}")]
    Invalid(String),

    #[error("cannot signal pid {pid}: {errno}")]
    Signal { pid: u32, errno: nix::errno::Errno },
}
