#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{classify, domain, plan, profile, rules, validate};
use crate::models::args::{Cli, Commands};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use wspec::kernel::config::load_app_config;
use wspec_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_app_config(cli.config.as_deref()).context("Failed to load config")?;
    if cli.verbose {
        "debug".clone_into(&mut config.logging.level);
    }

    let _logger = Logger::from_config(env!("CARGO_BIN_NAME"), &config.logging)
        .context("Failed to initialise logging")?;
    debug!(kb = %config.knowledge.kb_path.display(), strict = config.knowledge.strict, "Configuration loaded");

    let output = handlers::Output::new(cli.json);

    match cli.command {
        Commands::Validate { strict } => validate::validate(&config, strict, output)?,
        Commands::Classify { kind, id } => classify::classify(&config, kind, &id, output)?,
        Commands::Domain { name } => domain::lookup(&config, &name, output)?,
        Commands::Profile { paths, apps } => profile::profile(&config, &paths, &apps, output)?,
        Commands::VetPlan { file, personas } => plan::vet(&config, &file, &personas, output)?,
        Commands::Rules {} => rules::list(&config, output)?,
    }

    Ok(())
}
