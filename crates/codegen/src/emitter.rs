//! Interface emitter
//!
//! [`ContractInterface::from_entries`] extracts what a binding exposes (methods and event
//! payloads with mapped types) from an ABI. A [`BindingRenderer`] turns that structure into
//! text for one target language, so retargeting never touches extraction or mapping.

use std::collections::HashSet;
use std::path::PathBuf;

use bindgen_common::Result;
use sha3::{Digest, Keccak256};

use crate::abi::{AbiEntry, AbiParam, StateMutability};
use crate::deployment::{NetworkConfig, ResolvedAddress};
use crate::reader::ContractArtifact;
use crate::types::{map_abi_type, SemanticType};

/// A named, mapped parameter or event field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Identifier used in generated code, never empty
    pub name: String,
    pub ty: SemanticType,
    /// Raw ABI tag the type was mapped from
    pub abi_type: String,
    pub indexed: bool,
}

/// One callable method of the binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    /// 4-byte selector, `0x`-hex
    pub selector: String,
    pub canonical_signature: String,
    pub mutability: StateMutability,
    pub params: Vec<NamedType>,
    pub returns: Vec<SemanticType>,
}

/// Payload shape of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventShape {
    pub name: String,
    /// 32-byte topic hash, `0x`-hex
    pub topic: String,
    pub canonical_signature: String,
    pub anonymous: bool,
    pub fields: Vec<NamedType>,
}

/// Everything a binding exposes, in ABI source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInterface {
    pub contract_name: String,
    pub methods: Vec<MethodSignature>,
    pub events: Vec<EventShape>,
}

impl ContractInterface {
    /// Constructors, fallbacks, receive functions and errors are not interface members.
    pub fn from_entries(contract_name: &str, entries: &[AbiEntry]) -> Self {
        let mut methods = Vec::new();
        let mut events = Vec::new();

        for entry in entries {
            match entry {
                AbiEntry::Function(function) => {
                    let canonical_signature = function.canonical_signature();
                    let hash = keccak256(&canonical_signature);
                    methods.push(MethodSignature {
                        name: function.name.clone(),
                        selector: format!("0x{}", hex::encode(&hash[..4])),
                        canonical_signature,
                        mutability: function.mutability(),
                        params: named_types(&function.inputs),
                        returns: function.outputs.iter().map(|o| map_abi_type(&o.param_type)).collect(),
                    });
                }
                AbiEntry::Event(event) => {
                    let canonical_signature = event.canonical_signature();
                    events.push(EventShape {
                        name: event.name.clone(),
                        topic: format!("0x{}", hex::encode(keccak256(&canonical_signature))),
                        canonical_signature,
                        anonymous: event.anonymous,
                        fields: named_types(&event.inputs),
                    });
                }
                AbiEntry::Constructor(_)
                | AbiEntry::Fallback(_)
                | AbiEntry::Receive(_)
                | AbiEntry::Error(_) => {}
            }
        }

        Self {
            contract_name: contract_name.to_string(),
            methods,
            events,
        }
    }

    pub fn read_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter().filter(|m| m.mutability.is_read_only())
    }

    pub fn write_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter().filter(|m| !m.mutability.is_read_only())
    }
}

/// Output bundle for one contract. Immutable once generated.
#[derive(Debug, Clone)]
pub struct GeneratedBinding {
    pub contract_name: String,
    /// Verbatim ABI array, pretty printed
    pub abi_json: String,
    pub interface: ContractInterface,
    pub interface_source: String,
    /// How the renderer spells the hex address type
    pub address_marker: String,
    pub bytecode: Option<String>,
}

impl GeneratedBinding {
    pub fn generate<R: BindingRenderer + ?Sized>(
        artifact: &ContractArtifact,
        renderer: &R,
        include_bytecode: bool,
    ) -> Result<Self> {
        let interface = ContractInterface::from_entries(&artifact.contract_name, &artifact.entries);
        let bytecode = if include_bytecode { artifact.bytecode.clone() } else { None };

        let mut abi_json = serde_json::to_string_pretty(&artifact.raw_abi)?;
        abi_json.push('\n');

        let interface_source = renderer.render_interface(&interface, bytecode.as_deref())?;

        Ok(Self {
            contract_name: artifact.contract_name.clone(),
            abi_json,
            address_marker: renderer.type_name(&SemanticType::Address),
            interface,
            interface_source,
            bytecode,
        })
    }
}

/// Inputs for the aggregate files written once per run
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    pub bindings: &'a [GeneratedBinding],
    /// One entry per configured contract, including skipped ones
    pub addresses: &'a [ResolvedAddress],
    pub network: &'a NetworkConfig,
    /// Contracts that were configured but not generated
    pub skipped: &'a [String],
}

/// A file to write, relative to the destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub relative_path: PathBuf,
    pub content: String,
}

/// Renders bindings for one target language
pub trait BindingRenderer {
    /// Spelling of a semantic type in the target language
    fn type_name(&self, ty: &SemanticType) -> String;

    /// Path of the per-contract interface file, relative to the destination
    fn interface_path(&self, contract_name: &str) -> PathBuf;

    /// Path of the per-contract ABI JSON file, relative to the destination
    fn abi_path(&self, contract_name: &str) -> PathBuf {
        PathBuf::from("abis").join(format!("{}.json", contract_name))
    }

    fn render_interface(&self, interface: &ContractInterface, bytecode: Option<&str>) -> Result<String>;

    /// Address registry, network config, index, README and any shared type files
    fn render_aggregate(&self, context: &ExportContext<'_>) -> Result<Vec<RenderedFile>>;
}

/// Placeholder identifier for an unnamed parameter at `index`
pub fn placeholder_name(index: usize) -> String {
    format!("arg{}", index)
}

/// Placeholders never shadow a declared name in the same list: `arg0` becomes `arg0_`
/// when a sibling is already called `arg0`.
fn named_types(params: &[AbiParam]) -> Vec<NamedType> {
    let mut taken: HashSet<String> = params
        .iter()
        .map(|param| param.name.trim())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let name = if param.name.trim().is_empty() {
                let mut candidate = placeholder_name(index);
                while taken.contains(&candidate) {
                    candidate.push('_');
                }
                taken.insert(candidate.clone());
                candidate
            } else {
                param.name.clone()
            };
            NamedType {
                name,
                ty: map_abi_type(&param.param_type),
                abi_type: param.param_type.clone(),
                indexed: param.indexed,
            }
        })
        .collect()
}

fn keccak256(input: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{EventEntry, FunctionEntry, SpecialEntry};

    fn function(name: &str, inputs: Vec<AbiParam>, outputs: Vec<AbiParam>, mutability: StateMutability) -> AbiEntry {
        AbiEntry::Function(FunctionEntry {
            name: name.to_string(),
            inputs,
            outputs,
            state_mutability: Some(mutability),
            constant: None,
            payable: None,
        })
    }

    #[test]
    fn test_well_known_selectors() {
        let entries = vec![
            function(
                "transfer",
                vec![AbiParam::new("to", "address"), AbiParam::new("amount", "uint256")],
                vec![AbiParam::new("", "bool")],
                StateMutability::Nonpayable,
            ),
            AbiEntry::Event(EventEntry {
                name: "Transfer".to_string(),
                inputs: vec![
                    AbiParam::new("from", "address"),
                    AbiParam::new("to", "address"),
                    AbiParam::new("value", "uint256"),
                ],
                anonymous: false,
            }),
        ];

        let interface = ContractInterface::from_entries("Token", &entries);
        assert_eq!(interface.methods[0].selector, "0xa9059cbb");
        assert_eq!(interface.methods[0].canonical_signature, "transfer(address,uint256)");
        assert_eq!(
            interface.events[0].topic,
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_only_functions_and_events_are_members() {
        let entries = vec![
            AbiEntry::Constructor(SpecialEntry {
                inputs: vec![AbiParam::new("_admin", "address")],
                state_mutability: None,
                payable: None,
            }),
            function("isAdmin", vec![AbiParam::new("_user", "address")], vec![AbiParam::new("", "bool")], StateMutability::View),
            AbiEntry::Receive(SpecialEntry {
                inputs: vec![],
                state_mutability: Some(StateMutability::Payable),
                payable: None,
            }),
            function("addAdmin", vec![AbiParam::new("_admin", "address")], vec![], StateMutability::Nonpayable),
        ];

        let interface = ContractInterface::from_entries("RegistrationContract", &entries);
        let names: Vec<&str> = interface.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["isAdmin", "addAdmin"]);
        assert!(interface.events.is_empty());
        assert_eq!(interface.read_methods().count(), 1);
        assert_eq!(interface.write_methods().count(), 1);
    }

    #[test]
    fn test_unnamed_params_get_placeholders() {
        let entries = vec![function(
            "setRecord",
            vec![AbiParam::new("", "string"), AbiParam::new("owner", "address"), AbiParam::new(" ", "bytes32")],
            vec![],
            StateMutability::Nonpayable,
        )];

        let interface = ContractInterface::from_entries("Records", &entries);
        let names: Vec<&str> = interface.methods[0].params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arg0", "owner", "arg2"]);
        assert_eq!(interface.methods[0].params[0].ty, SemanticType::String);
    }

    #[test]
    fn test_placeholders_do_not_collide_with_declared_names() {
        let entries = vec![
            function(
                "pair",
                vec![AbiParam::new("", "uint256"), AbiParam::new("arg0", "address")],
                vec![],
                StateMutability::Nonpayable,
            ),
            AbiEntry::Event(EventEntry {
                name: "Linked".to_string(),
                inputs: vec![
                    AbiParam::new("arg1", "address"),
                    AbiParam::new("", "uint256"),
                    AbiParam::new("arg1_", "bool"),
                ],
                anonymous: false,
            }),
        ];

        let interface = ContractInterface::from_entries("Pairs", &entries);
        let params: Vec<&str> = interface.methods[0].params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["arg0_", "arg0"]);
        let fields: Vec<&str> = interface.events[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["arg1", "arg1__", "arg1_"]);
    }
}
