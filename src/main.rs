//! tgs-conf
//!
//! Operator tool for the API service configuration: prints the usage table
//! and resolves a configuration the way the service would at start-up.

use anyhow::{Context, Result};
use clap::Parser;
use tgs_conf::cli::{CheckArgs, Cli, Command, OutputFormat, UsageArgs};
use tgs_conf::config::{Loader, SecretStore, SecretsFile};
use tgs_conf::logging::{self, LogTarget};
use tgs_conf::service::ApiConfig;
use tracing::{debug, info};

const PROGRAM: &str = "tgs-api";

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, &LogTarget::parse(&cli.log))?;

    match cli.command {
        Command::Usage(args) => run_usage(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_usage(args: UsageArgs) -> Result<()> {
    let mut cfg = ApiConfig::default();
    let usage = Loader::new(args.prefix)
        .with_program_name(PROGRAM)
        .usage(&mut cfg)?;
    print!("{}", usage);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let mut loader = Loader::new(args.prefix.as_str())
        .with_program_name(PROGRAM)
        .with_args(args.args);

    if let Some(path) = &args.secrets {
        let store = SecretStore::load(&SecretsFile::new(path))
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("loading secrets from {}", path.display()))?;
        debug!(secrets = store.len(), "Using secret store");
        loader = loader.with_provider(store);
    }

    let mut cfg = ApiConfig::default();
    if let Err(err) = loader.parse(&mut cfg) {
        if let Some(usage) = err.usage() {
            print!("{}", usage);
            return Ok(());
        }
        return Err(err).context("resolving configuration");
    }
    info!(prefix = %args.prefix, "Configuration resolved");

    match args.format {
        OutputFormat::Text => print!("{}", loader.render(&mut cfg)?),
        OutputFormat::Json => {
            let fields = loader.rendered_fields(&mut cfg)?;
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
    }
    Ok(())
}
