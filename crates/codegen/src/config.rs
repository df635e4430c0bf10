/// Configuration management for binding generation
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentRecord;

/// Contracts exported when nothing else is configured
pub const DEFAULT_CONTRACTS: [&str; 3] = ["RegistrationContract", "EmailDomainVerifier", "WebProofVerifier"];

/// Everything one generator run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindgenConfig {
    /// Which artifacts to process, in output order
    pub contract_names: Vec<String>,

    /// Where build artifacts live (`<source_dir>/<Name>.sol/<Name>.json`)
    pub source_dir: PathBuf,

    /// Where bindings are written
    pub dest_dir: PathBuf,

    /// Selects `<deployments_dir>/<environment>.json`
    pub environment: String,

    pub deployments_dir: PathBuf,

    /// Explicit deployment record file, overrides the environment lookup
    pub deployment_file: Option<PathBuf>,

    /// In-memory deployment record, overrides both file options
    #[serde(skip)]
    pub deployment: Option<DeploymentRecord>,

    /// Export artifact bytecode alongside the interface
    pub include_bytecode: bool,

    /// Log the files that would be written without touching the destination
    pub dry_run: bool,
}

impl Default for BindgenConfig {
    fn default() -> Self {
        Self {
            contract_names: DEFAULT_CONTRACTS.iter().map(|s| s.to_string()).collect(),
            source_dir: PathBuf::from("out"),
            dest_dir: PathBuf::from("generated"),
            environment: "localhost".to_string(),
            deployments_dir: PathBuf::from("deployments"),
            deployment_file: None,
            deployment: None,
            include_bytecode: false,
            dry_run: false,
        }
    }
}

impl BindgenConfig {
    /// Reject configurations that cannot produce valid bindings
    pub fn validate(&self) -> bindgen_common::Result<()> {
        if self.contract_names.is_empty() {
            return Err(bindgen_common::Error::config("contract list cannot be empty"));
        }

        for (index, name) in self.contract_names.iter().enumerate() {
            if !is_identifier(name) {
                return Err(bindgen_common::Error::config(format!(
                    "contract name {:?} is not a valid identifier",
                    name
                )));
            }
            if self.contract_names[..index].contains(name) {
                return Err(bindgen_common::Error::config(format!("contract {} is listed twice", name)));
            }
        }

        if self.environment.trim().is_empty() {
            return Err(bindgen_common::Error::config("environment name cannot be empty"));
        }

        Ok(())
    }

    /// Deployment record file consulted when no in-memory record is set
    pub fn deployment_path(&self) -> PathBuf {
        self.deployment_file
            .clone()
            .unwrap_or_else(|| self.deployments_dir.join(format!("{}.json", self.environment)))
    }

    /// The in-memory record if set, otherwise whatever the deployment file holds
    pub fn resolve_deployment(&self) -> Option<DeploymentRecord> {
        self.deployment
            .clone()
            .or_else(|| DeploymentRecord::load_optional(self.deployment_path()))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Loads a [`BindgenConfig`] from files and environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: BindgenConfig,
}

impl ConfigManager {
    /// Create a new configuration manager with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a `.toml`, `.json`, `.yaml` or `.yml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML configuration file: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON configuration file: {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML configuration file: {}", path.display()))?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml"
                ))
            }
        };

        Ok(Self { config })
    }

    /// Apply `BINDGEN_*` environment variable overrides
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source_dir) = lookup("BINDGEN_SOURCE_DIR") {
            self.config.source_dir = PathBuf::from(source_dir);
        }
        if let Some(dest_dir) = lookup("BINDGEN_DEST_DIR") {
            self.config.dest_dir = PathBuf::from(dest_dir);
        }
        if let Some(environment) = lookup("BINDGEN_ENVIRONMENT") {
            if environment.trim().is_empty() {
                return Err(anyhow::anyhow!("Invalid BINDGEN_ENVIRONMENT value: empty"));
            }
            self.config.environment = environment.trim().to_string();
        }
        if let Some(contracts) = lookup("BINDGEN_CONTRACTS") {
            self.config.contract_names = split_contract_list(&contracts);
        }
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &BindgenConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut BindgenConfig {
        &mut self.config
    }

    pub fn into_config(self) -> BindgenConfig {
        self.config
    }

    /// Save the current configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&self.config)
                .with_context(|| "Failed to serialize configuration to TOML")?,
            Some("json") => serde_json::to_string_pretty(&self.config)
                .with_context(|| "Failed to serialize configuration to JSON")?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(&self.config)
                .with_context(|| "Failed to serialize configuration to YAML")?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml"
                ))
            }
        };

        fs::write(path, content).with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }
}

/// Parse a comma-separated contract list, dropping blanks
pub fn split_contract_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
