//! verify_passwd: check a user's password against the shadow database.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use rpctest_shadow::{check_algorithm, verify_password, ShadowDb};

#[derive(Parser)]
#[command(
    name = "verify_passwd",
    about = "Check a user's password using the stored crypt hash",
    version
)]
struct Cli {
    /// Fail unless the stored hash uses this algorithm (des, md5, sha256, sha512).
    #[arg(short = 'A', long, value_name = "HASHALGO")]
    algorithm: Option<String>,

    /// Shadow-format file to look the user up in.
    #[arg(long, value_name = "FILE", default_value = rpctest_shadow::DEFAULT_SHADOW_PATH)]
    shadow: PathBuf,

    /// User whose password is checked.
    username: String,

    /// Password to check; prompted for when omitted.
    password: Option<String>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let entry = ShadowDb::new(&cli.shadow).lookup(&cli.username)?;
    let algorithm = check_algorithm(&entry, cli.algorithm.as_deref())?;
    println!("User's password is hashed using {algorithm}");

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Please enter password: ")
            .context("Unable to get password")?,
    };

    verify_password(&entry, &password)?;
    Ok(())
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
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => {
            println!("Password verified OK.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
