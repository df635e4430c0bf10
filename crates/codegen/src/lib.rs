//! Typed contract bindings from build-artifact ABIs
//!
//! Reads `<Name>.sol/<Name>.json` build artifacts, maps every ABI type to a
//! language-neutral [`SemanticType`], and renders per-contract interface files plus an
//! address registry, network config, index and README.

pub mod abi;
pub mod config;
pub mod deployment;
pub mod emitter;
pub mod export;
pub mod reader;
pub mod templates;
pub mod types;
pub mod typescript;

pub use abi::{AbiEntry, AbiParam, StateMutability};
pub use config::{BindgenConfig, ConfigManager};
pub use deployment::{DeploymentRecord, NetworkConfig, PLACEHOLDER_ADDRESS};
pub use emitter::{BindingRenderer, ContractInterface, GeneratedBinding};
pub use export::{export_bindings, BindingExporter, ExportReport, SkippedContract, MANIFEST_FILE};
pub use reader::{AbiReader, ContractArtifact};
pub use types::{map_abi_type, SemanticType};
pub use typescript::TypeScriptRenderer;

pub use bindgen_common::{Error, Result};
