use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use chain_options::chain::apply_instructions;
use chain_options::config::OptionFile;
use chain_options::logging::init_tracing;
use chain_options::{ChainOptions, MethodTable, OptionCall, OptionHost, OptionValue};

#[derive(Parser, Debug)]
#[command(name = "chain-options")]
#[command(about = "Inspect and exercise chain option definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a definition file and list its options and warnings
    Check {
        /// Option definition file (TOML)
        file: PathBuf,
    },

    /// Apply writes in order and print the resulting option values as JSON
    Apply {
        /// Option definition file (TOML)
        file: PathBuf,

        /// Write instruction `name=value`; value is JSON, or a plain string
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Apply { file, sets } => apply(&file, &sets),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_host(file: &Path) -> Result<OptionHost> {
    let definitions = OptionFile::load_from(file)?;
    let registry = definitions.build_registry(MethodTable::new())?;
    Ok(OptionHost::new(registry))
}

fn check(file: &Path) -> Result<()> {
    let host = load_host(file)?;
    let registry = host.option_registry();

    for name in registry.names() {
        let spec = registry.resolve(name)?;
        let params: Vec<String> = spec
            .summary()
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        println!("{} ({})", name, params.join(", "));
    }
    for warning in registry.warnings() {
        println!("warning: {}", warning);
    }
    Ok(())
}

fn apply(file: &Path, sets: &[String]) -> Result<()> {
    let host = load_host(file)?;
    let instructions = sets
        .iter()
        .map(|raw| parse_instruction(raw))
        .collect::<Result<Vec<_>>>()?;

    let host = apply_instructions(host, instructions)?;

    let mut output = serde_json::Map::new();
    for name in host.option_registry().names() {
        let value = host.get_option(name)?;
        output.insert(name.to_string(), serde_json::Value::from(&value));
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_instruction(raw: &str) -> Result<(String, OptionCall)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", raw))?;
    Ok((name.to_string(), OptionCall::arg(parse_value(value)?)))
}

fn parse_value(raw: &str) -> Result<OptionValue> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => OptionValue::try_from(json).with_context(|| format!("value '{}'", raw)),
        Err(_) => Ok(OptionValue::from(raw)),
    }
}
