//! Build-artifact reader
//!
//! Resolves `<source_dir>/<Name>.sol/<Name>.json`, parses it and decodes the `abi` array
//! into [`AbiEntry`] values in source order.

use std::path::{Path, PathBuf};

use bindgen_common::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::abi::AbiEntry;

const KNOWN_KINDS: [&str; 6] = ["function", "event", "constructor", "fallback", "receive", "error"];

/// Parsed build artifact for one contract
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    /// Decoded entries, source order preserved
    pub entries: Vec<AbiEntry>,
    /// The `abi` array exactly as found in the artifact
    pub raw_abi: Value,
    /// Deployment bytecode, if the artifact carries any
    pub bytecode: Option<String>,
}

/// Reads contract build artifacts from a source directory
#[derive(Debug, Clone)]
pub struct AbiReader {
    source_dir: PathBuf,
}

impl AbiReader {
    pub fn new<P: Into<PathBuf>>(source_dir: P) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Expected artifact location for a contract
    pub fn artifact_path(&self, contract_name: &str) -> PathBuf {
        self.source_dir
            .join(format!("{}.sol", contract_name))
            .join(format!("{}.json", contract_name))
    }

    /// Read and decode the artifact for `contract_name`
    pub fn read(&self, contract_name: &str) -> Result<ContractArtifact> {
        let path = self.artifact_path(contract_name);
        debug!(contract = contract_name, path = %path.display(), "Reading build artifact");

        if !path.is_file() {
            return Err(Error::artifact_not_found(contract_name, path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::artifact_not_found(contract_name, path.clone()),
            _ => Error::artifact_parse(contract_name, format!("unreadable artifact: {}", e)),
        })?;

        Self::parse_content(contract_name, &content)
    }

    /// Decode artifact JSON content
    pub fn parse_content(contract_name: &str, content: &str) -> Result<ContractArtifact> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::artifact_parse(contract_name, format!("invalid JSON: {}", e)))?;

        let raw_abi = value
            .get("abi")
            .cloned()
            .ok_or_else(|| Error::artifact_parse(contract_name, "missing `abi` field"))?;

        let items = raw_abi
            .as_array()
            .ok_or_else(|| Error::artifact_parse(contract_name, "`abi` field must be an array"))?;

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if let Some(entry) = Self::decode_entry(contract_name, index, item)? {
                entries.push(entry);
            }
        }

        Ok(ContractArtifact {
            contract_name: contract_name.to_string(),
            entries,
            raw_abi,
            bytecode: Self::extract_bytecode(&value),
        })
    }

    fn decode_entry(contract_name: &str, index: usize, item: &Value) -> Result<Option<AbiEntry>> {
        let mut object = item
            .as_object()
            .cloned()
            .ok_or_else(|| Error::artifact_parse(contract_name, format!("abi[{}] is not an object", index)))?;

        // Legacy ABIs omit the discriminator on functions
        let kind = match object.get("type") {
            None => "function".to_string(),
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(Error::artifact_parse(
                    contract_name,
                    format!("abi[{}] has non-string type {}", index, other),
                ))
            }
        };

        if !KNOWN_KINDS.contains(&kind.as_str()) {
            debug!(contract = contract_name, index, kind = %kind, "Skipping unknown ABI entry kind");
            return Ok(None);
        }
        object.insert("type".to_string(), Value::String(kind));

        let entry: AbiEntry = serde_json::from_value(Value::Object(object))
            .map_err(|e| Error::artifact_parse(contract_name, format!("abi[{}]: {}", index, e)))?;

        let named_kind = matches!(entry, AbiEntry::Function(_) | AbiEntry::Event(_));
        if named_kind && entry.name().map_or(true, str::is_empty) {
            return Err(Error::artifact_parse(
                contract_name,
                format!("abi[{}] {} entry has an empty name", index, entry.kind()),
            ));
        }

        Ok(Some(entry))
    }

    /// Hardhat stores bytecode as a string, Foundry as `{ "object": "0x..." }`
    fn extract_bytecode(artifact: &Value) -> Option<String> {
        let bytecode = match artifact.get("bytecode")? {
            Value::String(code) => code.clone(),
            Value::Object(object) => object.get("object")?.as_str()?.to_string(),
            _ => return None,
        };

        let trimmed = bytecode.trim();
        if trimmed.is_empty() || trimmed == "0x" {
            return None;
        }
        if trimmed.starts_with("0x") {
            Some(trimmed.to_string())
        } else {
            Some(format!("0x{}", trimmed))
        }
    }
}
