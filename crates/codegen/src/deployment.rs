//! Deployment records and network identity
//!
//! A deployment record maps contract names to deployed addresses for one network. When no
//! record is available every contract gets [`PLACEHOLDER_ADDRESS`].

use std::collections::BTreeMap;
use std::path::Path;

use bindgen_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Substituted when no deployed address is known at generation time
pub const PLACEHOLDER_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Network the bindings target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(rename = "network")]
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "localhost".to_string(),
            chain_id: 31337,
            rpc_url: "http://127.0.0.1:8545".to_string(),
        }
    }
}

/// Deployed addresses for one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    #[serde(flatten)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

/// Address chosen for one configured contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub contract_name: String,
    pub address: String,
    pub is_placeholder: bool,
}

impl DeploymentRecord {
    /// Load a record from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read deployment record {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid deployment record {}: {}", path.display(), e)))
    }

    /// Load a record, treating a missing or unreadable file as "no record"
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            info!(path = %path.display(), "No deployment record found, using placeholder addresses");
            return None;
        }
        match Self::load(path) {
            Ok(record) => {
                debug!(path = %path.display(), network = %record.network.name, "Loaded deployment record");
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring deployment record, using placeholder addresses");
                None
            }
        }
    }

    /// Resolve the address for `contract_name`, falling back to the placeholder
    pub fn resolve(&self, contract_name: &str) -> ResolvedAddress {
        match self.contracts.get(contract_name) {
            Some(address) if is_valid_address(address) => ResolvedAddress {
                contract_name: contract_name.to_string(),
                address: address.clone(),
                is_placeholder: false,
            },
            Some(address) => {
                warn!(contract = contract_name, address = %address, "Invalid deployed address, using placeholder");
                ResolvedAddress::placeholder(contract_name)
            }
            None => ResolvedAddress::placeholder(contract_name),
        }
    }
}

impl ResolvedAddress {
    pub fn placeholder(contract_name: &str) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            address: PLACEHOLDER_ADDRESS.to_string(),
            is_placeholder: true,
        }
    }
}

/// `0x` followed by exactly 40 hex characters
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .map_or(false, |hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}
