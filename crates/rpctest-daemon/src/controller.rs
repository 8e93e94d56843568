//! Launch sequence orchestration.
//!
//! `Parsed -> Killed` in kill mode, otherwise
//! `Parsed -> SingletonChecked -> Registered -> [Daemonized] -> Serving`.
//! Every step before `Serving` either succeeds or ends the launch with a
//! [`LaunchError`]; nothing is retried or rolled back.

use std::sync::Arc;

use rpctest_service::{Dispatch, ServiceRegistry, SquareService};
use rpctest_types::ProgramId;
use tracing::{debug, error, info};

use crate::config::LaunchConfig;
use crate::daemonize::Daemonizer;
use crate::error::LaunchError;
use crate::pidfile::Pidfile;
use crate::state::LaunchState;

/// Drives one launch of a service from parsed configuration to serving.
pub struct Controller<R, D> {
    config: LaunchConfig,
    registry: R,
    daemonizer: D,
    program: ProgramId,
    handler: Arc<dyn Dispatch>,
    state: LaunchState,
}

impl<R: ServiceRegistry, D: Daemonizer> Controller<R, D> {
    /// Create a controller launching the square program.
    pub fn new(config: LaunchConfig, registry: R, daemonizer: D) -> Self {
        Self {
            config,
            registry,
            daemonizer,
            program: ProgramId::square(),
            handler: Arc::new(SquareService),
            state: LaunchState::Parsed,
        }
    }

    /// Launch a different program instead of the square program.
    #[must_use]
    pub fn with_program(mut self, program: ProgramId, handler: Arc<dyn Dispatch>) -> Self {
        self.program = program;
        self.handler = handler;
        self
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Run the launch sequence.
    ///
    /// Only kill mode returns `Ok`. A launch that reaches the serve loop
    /// does not return unless the loop ends, which is reported as an error.
    pub fn run(&mut self) -> Result<(), LaunchError> {
        if self.config.kill {
            return self.kill();
        }

        let pidfile = self.config.pidfile.clone().map(Pidfile::new);
        if let Some(pidfile) = &pidfile {
            self.claim_pidfile(pidfile)?;
        }
        self.state = LaunchState::SingletonChecked;

        self.register()?;
        self.state = LaunchState::Registered;

        if !self.config.foreground {
            self.detach(pidfile.as_ref())?;
            self.state = LaunchState::Daemonized;
        }

        self.serve()
    }

    fn kill(&mut self) -> Result<(), LaunchError> {
        let pidfile = self
            .config
            .pidfile
            .clone()
            .map(Pidfile::new)
            .ok_or_else(|| LaunchError::Usage("kill mode needs a pidfile".to_string()))?;

        let pid = pidfile.kill().map_err(|source| LaunchError::Kill {
            path: pidfile.path().to_path_buf(),
            source,
        })?;
        info!(pid, "stopped running instance");
        self.state = LaunchState::Killed;
        Ok(())
    }

    /// Refuse to start next to a live instance, then record our own pid
    /// right away so permission problems surface while still attached.
    fn claim_pidfile(&self, pidfile: &Pidfile) -> Result<(), LaunchError> {
        if let Some(pid) = pidfile.running_pid() {
            error!(pid, path = %pidfile.path().display(), "instance already running");
            return Err(LaunchError::AlreadyRunning { pid });
        }

        pidfile
            .write(std::process::id())
            .map_err(|source| LaunchError::PidfileWrite {
                path: pidfile.path().to_path_buf(),
                source,
            })
    }

    /// Register on each configured nettype in order; the first failure
    /// aborts the launch without touching later nettypes.
    fn register(&mut self) -> Result<(), LaunchError> {
        let program = self.program;

        if self.config.nettypes.is_empty() {
            let (target, result) = if self.config.oldstyle {
                (
                    "oldstyle",
                    self.registry
                        .register_oldstyle(program, Arc::clone(&self.handler)),
                )
            } else {
                (
                    "newstyle",
                    self.registry
                        .register_newstyle(program, Arc::clone(&self.handler)),
                )
            };
            return result.map_err(|source| LaunchError::Registration {
                program,
                target: target.to_string(),
                source,
            });
        }

        for nettype in &self.config.nettypes {
            debug!(program = %program, nettype = ?nettype, "registering");
            self.registry
                .register(program, Arc::clone(&self.handler), nettype.as_deref())
                .map_err(|source| LaunchError::Registration {
                    program,
                    target: nettype
                        .clone()
                        .unwrap_or_else(|| "no preference".to_string()),
                    source,
                })?;
        }
        Ok(())
    }

    /// Go to the background and point the pidfile at the surviving process.
    fn detach(&mut self, pidfile: Option<&Pidfile>) -> Result<(), LaunchError> {
        let pid = self.daemonizer.detach()?;

        if let Some(pidfile) = pidfile {
            pidfile
                .write(pid)
                .map_err(|source| LaunchError::PidfileRewrite {
                    path: pidfile.path().to_path_buf(),
                    source,
                })?;
        }
        Ok(())
    }

    fn serve(&mut self) -> Result<(), LaunchError> {
        self.state = LaunchState::Serving;
        info!(program = %self.program, "serving");

        match self.registry.serve() {
            Ok(()) => Err(LaunchError::ServeReturned),
            Err(e) => Err(LaunchError::Serve(e)),
        }
    }
}
