//! Tubes - ephemeral AWS environments for bootstrapping BOSH.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tubes::cli::output;
use tubes::cli::{execute, Cli, Command};
use tubes::core::constants::SSH_KEY;
use tubes::error::{CloudError, ConfigError, Error, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("TUBES_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("tubes=debug")
        } else {
            EnvFilter::new("tubes=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(&cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e, &cli) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}

/// Follow-up advice for errors the operator can act on.
fn suggestion(e: &Error, cli: &Cli) -> Option<String> {
    let name = cli.name.as_deref().unwrap_or("<name>");
    match e {
        Error::Config(ConfigError::NoCommand) => Some("run: tubes --help".into()),
        Error::Config(ConfigError::MissingName) => {
            Some("pass --name <NAME> or set TUBES_NAME".into())
        }
        Error::Config(ConfigError::MissingAwsConfig) => Some(
            "set AWS_DEFAULT_REGION, AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY".into(),
        ),
        Error::Store(StoreError::NotEmpty) => Some(format!(
            "environment {name} already has local state; run: tubes -n {name} down, or pick another name"
        )),
        Error::Store(StoreError::NotFound(key)) if key == SSH_KEY => {
            Some(format!("run: tubes -n {name} up"))
        }
        Error::Cloud(CloudError::KeyPairExists(_)) => {
            Some(format!("run: tubes -n {name} down, then try again"))
        }
        Error::Cloud(_) | Error::Manifest(_) if cli.command == Some(Command::Up) => Some(format!(
            "partially created resources are left in place; run: tubes -n {name} down"
        )),
        _ => None,
    }
}
