//! solc-lane CLI
//!
//! Entry point for the `solc-lane` command-line tool.

use clap::{Parser, Subcommand};
use solc_lane::config::{self, ConfigFormat, LoadedConfig};
use solc_lane::report::ResolutionReport;
use solc_lane::{logging, ConfigResolver, SettingsBlock};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "solc-lane")]
#[command(about = "Resolve compiler version and settings per source file", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to config file (default: solc.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Read the config as a Hardhat `solidity` section (JSON)
    #[arg(long)]
    hardhat: bool,

    /// Override a config key, e.g. settings.optimizerRuns=500 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the compile spec for one or more source files
    Resolve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output a resolution report in JSON format
        #[arg(long)]
        json: bool,

        /// Write the JSON report to this file
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Source file paths, matched exactly against override rules
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List registered compiler versions in registration order
    Versions {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration
    Verify {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            config,
            json,
            out,
            files,
        } => run_resolve(&config, json, out, &files),
        Commands::Versions { config, json } => run_versions(&config, json),
        Commands::Verify { config } => run_verify(&config),
    }
}

fn load(args: &ConfigArgs) -> Result<(LoadedConfig, ConfigResolver), String> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("solc.toml"));
    let format = args.hardhat.then_some(ConfigFormat::Hardhat);

    let cli_layer = if args.set.is_empty() {
        None
    } else {
        Some(config::cli_layer(args.set.as_slice()).map_err(|e| e.to_string())?)
    };

    let loaded = config::load_file(&path, format, cli_layer).map_err(|e| e.to_string())?;
    let resolver = ConfigResolver::new(loaded.raw.clone())
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok((loaded, resolver))
}

fn load_or_exit(args: &ConfigArgs) -> (LoadedConfig, ConfigResolver) {
    match load(args) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn settings_json_or_exit(settings: &SettingsBlock) -> String {
    match serde_json::to_string(settings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error serializing settings: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(args: &ConfigArgs, json: bool, out: Option<PathBuf>, files: &[String]) {
    let (loaded, resolver) = load_or_exit(args);

    let report = match ResolutionReport::build(&resolver, loaded.sources, files) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = out {
        if let Err(e) = report.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
        eprintln!("Wrote: {}", path.display());
    }

    if json {
        match report.to_json() {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for entry in &report.entries {
        let settings = settings_json_or_exit(&entry.spec.settings);
        let marker = if entry.overridden { " (override)" } else { "" };
        println!(
            "{}\t{}{}\t{}",
            entry.path, entry.spec.compiler_version, marker, settings
        );
    }
}

fn run_versions(args: &ConfigArgs, json: bool) {
    let (_, resolver) = load_or_exit(args);
    let default = resolver.default_version().version.clone();

    if json {
        let output: Vec<serde_json::Value> = resolver
            .list_versions()
            .iter()
            .map(|v| {
                serde_json::json!({
                    "version": v.version,
                    "default": v.version == default,
                    "settings": v.settings,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for v in resolver.list_versions() {
        let marker = if v.version == default { " (default)" } else { "" };
        println!("{}{}", v.version, marker);
    }
}

fn run_verify(args: &ConfigArgs) {
    let (loaded, resolver) = load_or_exit(args);

    let path = loaded
        .sources
        .first()
        .and_then(|s| s.path.clone())
        .unwrap_or_default();
    println!("Configuration valid: {}", path);
    println!();
    println!("  Default version: {}", resolver.default_version().version);
    println!("  Compilers: {}", resolver.list_versions().len());
    println!("  Overrides: {}", resolver.overrides().count());
    if !resolver.global_settings().is_empty() {
        let settings = settings_json_or_exit(resolver.global_settings());
        println!("  Global settings: {}", settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_output() {
        let settings = SettingsBlock::new()
            .with_optimizer_enabled(true)
            .with_optimizer_runs(100);
        assert_eq!(
            settings_json_or_exit(&settings),
            r#"{"optimizerEnabled":true,"optimizerRuns":100}"#
        );
        assert_eq!(settings_json_or_exit(&SettingsBlock::new()), "{}");
    }

    #[test]
    fn test_cli_parses_set_layers() {
        let cli = Cli::try_parse_from([
            "solc-lane",
            "resolve",
            "--set",
            "settings.optimizerRuns=500",
            "--set",
            "default_version=0.6.12",
            "contracts/A.sol",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve { config, files, .. } => {
                assert_eq!(config.set.len(), 2);
                assert_eq!(files, vec!["contracts/A.sol".to_string()]);
            }
            _ => panic!("expected resolve"),
        }
    }
}
