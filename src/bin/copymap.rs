//! Command-line interface for mapping and copybook rendering
//!
//! Reads a pipeline configuration and a JSON scope, then prints either the
//! mapped record or the rendered fixed-width line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use copymap::{Pipeline, PipelineConfig, SimpleScope, Value};
use std::fs;
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "copymap")]
#[command(about = "Map JSON input with expressions and render fixed-width copybook records")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the input and render it as one fixed-width record
    Render {
        /// Pipeline configuration file (mappings, copybook, fieldMapping)
        #[arg(short, long)]
        config: String,
        /// JSON input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
        /// Skip fields whose expression fails
        #[arg(long)]
        ignore_errors: bool,
    },
    /// Map the input and print the mapped record as JSON
    Map {
        /// Pipeline configuration file
        #[arg(short, long)]
        config: String,
        /// JSON input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
        /// Skip fields whose expression fails
        #[arg(long)]
        ignore_errors: bool,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the rendered record length of a configuration
    Length {
        /// Pipeline configuration file
        #[arg(short, long)]
        config: String,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            config,
            input,
            ignore_errors,
        } => {
            let pipeline = load_pipeline(&config, ignore_errors)?;
            let scope = read_scope(input.as_deref())?;
            println!("{}", pipeline.run(&scope)?);
        }
        Commands::Map {
            config,
            input,
            ignore_errors,
            pretty,
        } => {
            let pipeline = load_pipeline(&config, ignore_errors)?;
            let scope = read_scope(input.as_deref())?;
            let record = Value::Object(pipeline.map(&scope)?);
            let output = if pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            println!("{output}");
        }
        Commands::Length { config } => {
            let pipeline = load_pipeline(&config, false)?;
            println!("{}", pipeline.record_length());
        }
    }
    Ok(())
}

fn load_pipeline(path: &str, ignore_errors: bool) -> Result<Pipeline> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading configuration '{path}'"))?;
    let mut config = PipelineConfig::from_json(&text)
        .with_context(|| format!("parsing configuration '{path}'"))?;
    if ignore_errors {
        config.ignore_mapping_errors = Some(true);
    }
    Pipeline::new(config).with_context(|| format!("compiling configuration '{path}'"))
}

fn read_scope(input: Option<&str>) -> Result<SimpleScope<'static>> {
    let text = match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading input '{path}'"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading input from stdin")?;
            buffer
        }
    };
    let json: serde_json::Value = serde_json::from_str(&text).context("parsing input JSON")?;
    if !json.is_object() {
        anyhow::bail!("input must be a JSON object");
    }
    Ok(SimpleScope::from_json(json))
}
