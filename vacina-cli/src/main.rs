//! Vacina CLI: drive the record controllers from a terminal.
//!
//! ```bash
//! vacina entities
//! vacina list vacinas
//! vacina create unidades-saude --set nome="Posto Central" --set endereco="Rua A, 10"
//! vacina delete vacinas 3 --yes
//! ```
//!
//! See `vacina --help` for all available commands and options.

mod commands;
mod terminal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vacina_core::config::{VacinaConfig, DEFAULT_CONFIG_FILE};
use vacina_core::model::RecordId;
use vacina_core::schema::Entity;

#[derive(Parser, Debug)]
#[command(name = "vacina", about = "Vaccination program records", version)]
struct Cli {
    /// Config file (default: ./vacina.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List the registered entities
    Entities,

    /// Show the fields of an entity
    Schema { entity: Entity },

    /// Fetch and print all records of an entity
    List {
        entity: Entity,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the picker options of every reference field
    Pickers { entity: Entity },

    /// Create a record
    Create {
        entity: Entity,

        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Edit a record; unset fields keep their current value
    Edit {
        entity: Entity,
        id: RecordId,

        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a record after confirmation
    Delete {
        entity: Entity,
        id: RecordId,

        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{}\"", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in \"{}\"", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>, base_url: Option<String>) -> anyhow::Result<VacinaConfig> {
    let mut config = match path {
        Some(path) => {
            let mut config = VacinaConfig::default();
            config.merge(VacinaConfig::from_file(path)?);
            config.apply_env_vars();
            config
        }
        None => VacinaConfig::load_from(DEFAULT_CONFIG_FILE)?,
    };
    if let Some(base_url) = base_url {
        config.client.base_url = base_url;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.base_url)?;
    vacina_core::logging::init_logging(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command {
        Commands::Entities => {
            print!("{}", commands::schema::entities());
            Ok(())
        }
        Commands::Schema { entity } => {
            print!("{}", commands::schema::fields(entity));
            Ok(())
        }
        Commands::List { entity, json } => {
            runtime.block_on(commands::records::list(&config, entity, json))
        }
        Commands::Pickers { entity } => runtime.block_on(commands::records::pickers(&config, entity)),
        Commands::Create { entity, set } => {
            runtime.block_on(commands::records::create(&config, entity, &set))
        }
        Commands::Edit { entity, id, set } => {
            runtime.block_on(commands::records::edit(&config, entity, id, &set))
        }
        Commands::Delete { entity, id, yes } => {
            runtime.block_on(commands::records::delete(&config, entity, id, yes))
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
