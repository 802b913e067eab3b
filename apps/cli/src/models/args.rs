//! # CLI Argument Definitions
//!
//! This module defines the command-line interface of `winspector` using the `clap` crate.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wspec::domain::component::ComponentKind;
use wspec::domain::persona::Persona;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "winspector")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Query the WinSpector Pro knowledge base")]
pub struct Cli {
    /// Config file (defaults to `winspector.toml` in the working directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load every configured knowledge file and report what was found
    Validate {
        /// Fail when an identifier is both critical and recommended for removal
        #[arg(long)]
        strict: bool,
    },
    /// Classify a component identifier
    Classify {
        /// service, uwp_app or scheduled_task (plural forms accepted)
        kind: ComponentKind,
        /// Service name, package name or task path
        id: String,
    },
    /// Look up a host name in the telemetry domain lists
    Domain {
        name: String,
    },
    /// Rank personas from observed paths and installed applications
    Profile {
        /// Observed filesystem path (repeatable)
        #[arg(short, long = "path")]
        paths: Vec<String>,
        /// Installed application display name (repeatable)
        #[arg(short, long = "app")]
        apps: Vec<String>,
    },
    /// Vet an optimisation plan (JSON or YAML) against the knowledge base
    VetPlan {
        file: PathBuf,
        /// Persona the plan is for (repeatable)
        #[arg(short, long = "persona")]
        personas: Vec<Persona>,
    },
    /// List the heuristic cleanup rules
    Rules {},
}
