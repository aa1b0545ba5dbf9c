//! # shapemap-cli
//!
//! Command-line demonstration of the shapemap mapping engine.
//!
//! Builds the animal mapping from its profile, maps input given on the
//! command line, and prints the result as JSON.

mod animal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shapemap_mapping::{MapperConfig, TypeMapper};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::animal::{Animal, AnimalDto, AnimalProfile};

#[derive(Parser)]
#[command(name = "shapemap")]
#[command(about = "Object-to-object mapping demo")]
#[command(version)]
struct Cli {
    /// Path to mapper configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map an AnimalDto to an Animal
    Animal {
        /// First name
        #[arg(long)]
        firstname: String,

        /// Last name
        #[arg(long)]
        lastname: String,

        /// Age in years; text that is not a number fails the mapping's type
        /// check, numbers that are not whole years fail building the Animal
        #[arg(long, allow_negative_numbers = true)]
        age: String,
    },

    /// List registered type pairs
    Pairs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MapperConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MapperConfig::default(),
    };

    let mut mapper = TypeMapper::with_config(config);
    mapper.add_profile(&AnimalProfile)?;

    match cli.command {
        Commands::Animal {
            firstname,
            lastname,
            age,
        } => {
            let dto = AnimalDto::from_args(firstname, lastname, &age);
            tracing::info!("Mapping {} {}", dto.firstname, dto.lastname);
            let animal: Animal = mapper.map(&dto)?;
            println!("{}", serde_json::to_string_pretty(&animal)?);
        }
        Commands::Pairs => {
            for key in mapper.registered_pairs() {
                println!("{key}");
            }
        }
    }

    Ok(())
}
