//! Contract ABI data model
//!
//! Every ABI element is decoded once into a closed [`AbiEntry`] union. Each variant only
//! carries the fields that are meaningful for its kind.

use serde::{Deserialize, Serialize};

/// State mutability of a function, constructor, fallback or receive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl StateMutability {
    /// Whether calling the function only reads chain state
    pub fn is_read_only(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }

    /// Resolve mutability for entries that may predate the `stateMutability` field
    pub fn resolve(explicit: Option<Self>, constant: Option<bool>, payable: Option<bool>) -> Self {
        if let Some(mutability) = explicit {
            return mutability;
        }
        if constant.unwrap_or(false) {
            StateMutability::View
        } else if payable.unwrap_or(false) {
            StateMutability::Payable
        } else {
            StateMutability::Nonpayable
        }
    }
}

impl std::fmt::Display for StateMutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateMutability::Pure => write!(f, "pure"),
            StateMutability::View => write!(f, "view"),
            StateMutability::Nonpayable => write!(f, "nonpayable"),
            StateMutability::Payable => write!(f, "payable"),
        }
    }
}

/// One parameter of a function, event or error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name, empty for unnamed parameters
    #[serde(default)]
    pub name: String,
    /// Primitive type tag (e.g. `uint256`, `address[]`, `bytes32[3]`)
    #[serde(rename = "type")]
    pub param_type: String,
    /// Only meaningful for event parameters
    #[serde(default)]
    pub indexed: bool,
    /// Tuple components, kept for canonical signatures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, param_type: T) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            indexed: false,
            components: Vec::new(),
        }
    }

    /// Canonical type used in selectors; tuples expand to their component list
    pub fn canonical_type(&self) -> String {
        match self.param_type.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> = self.components.iter().map(|c| c.canonical_type()).collect();
                format!("({}){}", inner.join(","), suffix)
            }
            None => self.param_type.clone(),
        }
    }
}

/// Callable function entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
}

impl FunctionEntry {
    pub fn mutability(&self) -> StateMutability {
        StateMutability::resolve(self.state_mutability, self.constant, self.payable)
    }

    /// `name(type1,type2)` as hashed for the selector
    pub fn canonical_signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }
}

/// Event entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub anonymous: bool,
}

impl EventEntry {
    pub fn canonical_signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }
}

/// Constructor, fallback or receive entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEntry {
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
}

impl SpecialEntry {
    pub fn mutability(&self) -> StateMutability {
        StateMutability::resolve(self.state_mutability, None, self.payable)
    }
}

/// Custom error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

/// One element of a contract ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    Function(FunctionEntry),
    Event(EventEntry),
    Constructor(SpecialEntry),
    Fallback(SpecialEntry),
    Receive(SpecialEntry),
    Error(ErrorEntry),
}

impl AbiEntry {
    /// The ABI `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            AbiEntry::Function(_) => "function",
            AbiEntry::Event(_) => "event",
            AbiEntry::Constructor(_) => "constructor",
            AbiEntry::Fallback(_) => "fallback",
            AbiEntry::Receive(_) => "receive",
            AbiEntry::Error(_) => "error",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AbiEntry::Function(f) => Some(&f.name),
            AbiEntry::Event(e) => Some(&e.name),
            AbiEntry::Error(e) => Some(&e.name),
            _ => None,
        }
    }
}

fn canonical_signature(name: &str, inputs: &[AbiParam]) -> String {
    let types: Vec<String> = inputs.iter().map(AbiParam::canonical_type).collect();
    format!("{}({})", name, types.join(","))
}
