//! Palisade CLI.
//!
//! Inspects schema documents against the configured role table.
//!
//! # Quick Start
//!
//! ```bash
//! # Which fields are guarded, which are denied by default
//! palisade audit schema.json --strict
//!
//! # Would an employee be allowed to read Query.customers?
//! palisade check schema.json Query.customers --role employee
//!
//! # Effective role table and configuration
//! palisade roles
//! palisade config --format toml
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use palisade::Palisade;
use palisade_config::{ConfigLoader, LoggingConfig, PalisadeConfig};
use tracing_subscriber::EnvFilter;

/// Palisade - deny-by-default field authorization for schema-driven APIs.
#[derive(Parser)]
#[command(name = "palisade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding palisade.toml.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Report the guard installed on every field of a schema document.
    Audit {
        /// Path to the JSON schema document.
        schema: PathBuf,

        /// Fail when any field is denied by default.
        #[arg(long)]
        strict: bool,
    },

    /// Resolve one field for a principal and report the outcome.
    Check {
        /// Path to the JSON schema document.
        schema: PathBuf,

        /// Field to resolve, as Type.field.
        target: String,

        /// Principal identifier (anonymous when neither subject nor role is given).
        #[arg(long)]
        subject: Option<String>,

        /// Role held by the principal. Repeatable.
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// Show the effective role table.
    Roles,

    /// Show the effective configuration.
    Config {
        /// Output format (text, json, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    if let Commands::Version = cli.command {
        commands::version::run();
        return Ok(());
    }

    let config: PalisadeConfig = ConfigLoader::new()
        .with_project_dir(&cli.project)
        .load()
        .with_context(|| format!("Failed to load configuration from {}", cli.project.display()))?;

    init_logging(&config.logging);

    let palisade = Palisade::from_config(&config).context("Invalid configuration")?;

    match cli.command {
        Commands::Version => Ok(()),
        Commands::Audit { schema, strict } => commands::audit::run(&palisade, &schema, strict),
        Commands::Check {
            schema,
            target,
            subject,
            roles,
        } => commands::check::run(&palisade, &schema, &target, subject.as_deref(), &roles),
        Commands::Roles => {
            commands::roles::run(&palisade);
            Ok(())
        }
        Commands::Config { format } => commands::config::show(&config, &format),
    }
}
