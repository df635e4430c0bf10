/// Binding generator entry point
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bindgen_codegen::config::split_contract_list;
use bindgen_codegen::{export_bindings, BindgenConfig, ConfigManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "contract-bindgen")]
#[command(author, version, about = "Generate typed bindings from contract build artifacts", long_about = None)]
struct Cli {
    /// Config file (.toml, .json, .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing <Name>.sol/<Name>.json build artifacts
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Output directory for generated bindings
    #[arg(long)]
    dest_dir: Option<PathBuf>,

    /// Environment selecting <deployments-dir>/<env>.json
    #[arg(long = "env")]
    environment: Option<String>,

    /// Directory holding per-environment deployment records
    #[arg(long)]
    deployments_dir: Option<PathBuf>,

    /// Comma-separated contract names to export
    #[arg(long)]
    contracts: Option<String>,

    /// Explicit deployment record file
    #[arg(long)]
    deployment: Option<PathBuf>,

    /// Export artifact bytecode alongside each interface
    #[arg(long)]
    include_bytecode: bool,

    /// Log the files that would be written without writing them
    #[arg(long)]
    dry_run: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    /// File config, then BINDGEN_* variables, then flags
    fn resolve_config(&self) -> Result<BindgenConfig> {
        let mut manager = match &self.config {
            Some(path) => ConfigManager::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConfigManager::new(),
        };
        manager.apply_environment_overrides()?;

        let config = manager.config_mut();
        if let Some(source_dir) = &self.source_dir {
            config.source_dir = source_dir.clone();
        }
        if let Some(dest_dir) = &self.dest_dir {
            config.dest_dir = dest_dir.clone();
        }
        if let Some(environment) = &self.environment {
            config.environment = environment.clone();
        }
        if let Some(deployments_dir) = &self.deployments_dir {
            config.deployments_dir = deployments_dir.clone();
        }
        if let Some(contracts) = &self.contracts {
            config.contract_names = split_contract_list(contracts);
        }
        if let Some(deployment) = &self.deployment {
            config.deployment_file = Some(deployment.clone());
        }
        config.include_bytecode |= self.include_bytecode;
        config.dry_run |= self.dry_run;

        Ok(manager.into_config())
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config = cli.resolve_config()?;
    info!(
        contracts = config.contract_names.len(),
        source = %config.source_dir.display(),
        dest = %config.dest_dir.display(),
        environment = %config.environment,
        "Exporting contract bindings"
    );

    let report = export_bindings(config)?;
    info!(files = report.written_files.len(), "Done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_required() {
        let cli = Cli::try_parse_from(["contract-bindgen"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "contract-bindgen",
            "--source-dir",
            "contracts/out",
            "--dest-dir",
            "web/src/generated",
            "--contracts",
            "RegistrationContract,WebProofVerifier",
            "--deployment",
            "deployments/anvil.json",
            "--include-bytecode",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.source_dir, PathBuf::from("contracts/out"));
        assert_eq!(config.dest_dir, PathBuf::from("web/src/generated"));
        assert_eq!(config.contract_names, vec!["RegistrationContract", "WebProofVerifier"]);
        assert_eq!(config.deployment_path(), PathBuf::from("deployments/anvil.json"));
        assert!(config.include_bytecode);
    }
}
