//! rpc.squared: launcher for the square test service.
//!
//! Registers the square program on the requested nettypes, detaches unless
//! told to stay in the foreground, and serves until killed. `-K` stops the
//! instance named in the pidfile instead.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use rpctest_daemon::config::nettype_from_arg;
use rpctest_daemon::error::EXIT_FAILURE;
use rpctest_daemon::{setup, Controller, ForkDaemonizer, LaunchConfig, LaunchError};
use rpctest_service::SocketRegistry;

#[derive(Parser)]
#[command(
    name = "rpc.squared",
    about = "Square test service for exercising RPC transports",
    version
)]
struct Cli {
    /// Stay in the foreground instead of detaching.
    #[arg(short = 'f')]
    foreground: bool,

    /// Send SIGTERM to the instance recorded in the pidfile and exit.
    #[arg(short = 'K')]
    kill: bool,

    /// Path of the pidfile.
    #[arg(short = 'p', value_name = "PATH")]
    pidfile: Option<PathBuf>,

    /// Use the legacy registration entry point when no nettype is given.
    #[arg(short = 'o')]
    oldstyle: bool,

    /// Register on this nettype; may be repeated. An empty string means no
    /// transport preference.
    #[arg(short = 'T', value_name = "NETTYPE")]
    nettype: Vec<String>,

    /// Path to configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer the command-line flags over the file configuration.
    fn apply(self, mut config: LaunchConfig) -> LaunchConfig {
        config.foreground |= self.foreground;
        config.kill |= self.kill;
        config.oldstyle |= self.oldstyle;
        if let Some(pidfile) = self.pidfile {
            config.pidfile = Some(pidfile);
        }
        if !self.nettype.is_empty() {
            config.nettypes = self.nettype.iter().map(|n| nettype_from_arg(n)).collect();
        }
        config
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn launch(cli: Cli) -> Result<(), LaunchError> {
    let config = setup::load_config(cli.config.as_deref())?;
    let config = cli.apply(config);
    init_logging(&config.log_level);

    tracing::info!(
        foreground = config.foreground,
        kill = config.kill,
        nettypes = ?config.nettypes,
        "starting rpc.squared"
    );

    let registry = SocketRegistry::new((&config.service).into());
    let mut controller = Controller::new(config, registry, ForkDaemonizer);
    controller.run()
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match launch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
