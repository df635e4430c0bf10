//! TypeScript rendering of contract bindings

use std::collections::HashMap;
use std::path::PathBuf;

use bindgen_common::Result;
use convert_case::{Case, Casing};
use serde::Serialize;

use crate::deployment::{NetworkConfig, PLACEHOLDER_ADDRESS};
use crate::emitter::{BindingRenderer, ContractInterface, ExportContext, MethodSignature, NamedType, RenderedFile};
use crate::templates::{self, TemplateManager};
use crate::types::SemanticType;

/// Words that cannot name a parameter in strict-mode TypeScript. Property names are exempt.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "implements", "import", "in", "instanceof", "interface", "let", "new", "null", "package",
    "private", "protected", "public", "return", "static", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Renders `.ts` bindings for a viem/ethers style frontend
pub struct TypeScriptRenderer {
    templates: TemplateManager,
}

#[derive(Serialize)]
struct MethodView {
    name: String,
    signature: String,
    selector: String,
    mutability: String,
    params: String,
    returns: String,
}

#[derive(Serialize)]
struct FieldView {
    name: String,
    ty: String,
    indexed: bool,
}

#[derive(Serialize)]
struct EventView {
    key: String,
    type_name: String,
    signature: String,
    topic: String,
    anonymous: bool,
    fields: Vec<FieldView>,
}

#[derive(Serialize)]
struct InterfaceView<'a> {
    contract_name: &'a str,
    abi_import: String,
    methods: Vec<MethodView>,
    events: Vec<EventView>,
    bytecode: Option<String>,
}

#[derive(Serialize)]
struct AddressView<'a> {
    contract_name: &'a str,
    constant_name: String,
    address: &'a str,
    is_placeholder: bool,
}

#[derive(Serialize)]
struct ReadmeContractView {
    name: String,
    variable_name: String,
    address: String,
    is_placeholder: bool,
    read_count: usize,
    write_count: usize,
    event_count: usize,
    interface_path: String,
    abi_path: String,
    methods: Vec<String>,
    events: Vec<String>,
    example_read: Option<String>,
}

impl TypeScriptRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: TemplateManager::new()?,
        })
    }

    /// `name(a: T, b: U)` parameter list
    fn param_list(&self, params: &[NamedType]) -> String {
        params
            .iter()
            .map(|p| format!("{}: {}", identifier(&p.name), self.type_name(&p.ty)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `void`, the single type, or a positional tuple
    fn return_type(&self, returns: &[SemanticType]) -> String {
        match returns {
            [] => "void".to_string(),
            [single] => self.type_name(single),
            many => {
                let types: Vec<String> = many.iter().map(|t| self.type_name(t)).collect();
                format!("[{}]", types.join(", "))
            }
        }
    }

    fn method_line(&self, method: &MethodSignature) -> String {
        format!(
            "{}({}): Promise<{}>",
            method.name,
            self.param_list(&method.params),
            self.return_type(&method.returns)
        )
    }

    fn path_string(path: PathBuf) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

impl BindingRenderer for TypeScriptRenderer {
    fn type_name(&self, ty: &SemanticType) -> String {
        match ty {
            SemanticType::BigInt => "bigint".to_string(),
            SemanticType::Number => "number".to_string(),
            SemanticType::Address => "Address".to_string(),
            SemanticType::Bool => "boolean".to_string(),
            SemanticType::Hex => "Hex".to_string(),
            SemanticType::String => "string".to_string(),
            SemanticType::Sequence(element) => format!("{}[]", self.type_name(element)),
            SemanticType::Untyped => "unknown".to_string(),
        }
    }

    fn interface_path(&self, contract_name: &str) -> PathBuf {
        PathBuf::from("contracts").join(format!("{}.ts", contract_name))
    }

    fn render_interface(&self, interface: &ContractInterface, bytecode: Option<&str>) -> Result<String> {
        let methods = interface
            .methods
            .iter()
            .map(|m| MethodView {
                name: m.name.clone(),
                signature: m.canonical_signature.clone(),
                selector: m.selector.clone(),
                mutability: m.mutability.to_string(),
                params: self.param_list(&m.params),
                returns: self.return_type(&m.returns),
            })
            .collect();

        // Overloads after the first are keyed by signature and numbered by occurrence
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let events = interface
            .events
            .iter()
            .map(|e| {
                let occurrence = occurrences.entry(e.name.as_str()).or_insert(0);
                *occurrence += 1;
                let (key, stem) = if *occurrence == 1 {
                    (e.name.clone(), e.name.clone())
                } else {
                    (string_literal(&e.canonical_signature), format!("{}_{}", e.name, occurrence))
                };
                EventView {
                    key,
                    type_name: format!("{}{}Event", interface.contract_name, stem),
                    signature: e.canonical_signature.clone(),
                    topic: e.topic.clone(),
                    anonymous: e.anonymous,
                    fields: e
                        .fields
                        .iter()
                        .map(|f| FieldView {
                            name: f.name.clone(),
                            ty: self.type_name(&f.ty),
                            indexed: f.indexed,
                        })
                        .collect(),
                }
            })
            .collect();

        let view = InterfaceView {
            contract_name: &interface.contract_name,
            abi_import: Self::path_string(self.abi_path(&interface.contract_name)),
            methods,
            events,
            bytecode: bytecode.map(string_literal),
        };

        self.templates.render(templates::CONTRACT_INTERFACE, &view)
    }

    fn render_aggregate(&self, context: &ExportContext<'_>) -> Result<Vec<RenderedFile>> {
        let mut files = Vec::new();

        files.push(RenderedFile {
            relative_path: PathBuf::from("types.ts"),
            content: self.templates.render(
                templates::TYPES,
                &serde_json::json!({ "placeholder_address": PLACEHOLDER_ADDRESS }),
            )?,
        });

        let addresses: Vec<AddressView<'_>> = context
            .addresses
            .iter()
            .map(|a| AddressView {
                contract_name: &a.contract_name,
                constant_name: format!("{}_ADDRESS", a.contract_name.to_case(Case::UpperSnake)),
                address: &a.address,
                is_placeholder: a.is_placeholder,
            })
            .collect();

        files.push(RenderedFile {
            relative_path: PathBuf::from("addresses.ts"),
            content: self.templates.render(
                templates::ADDRESSES,
                &serde_json::json!({ "network": network_view(context.network), "addresses": addresses }),
            )?,
        });

        files.push(RenderedFile {
            relative_path: PathBuf::from("config.ts"),
            content: self
                .templates
                .render(templates::CONFIG, &serde_json::json!({ "network": network_view(context.network) }))?,
        });

        let modules: Vec<String> = context
            .bindings
            .iter()
            .map(|b| {
                let path = self.interface_path(&b.contract_name).with_extension("");
                Self::path_string(path)
            })
            .collect();

        files.push(RenderedFile {
            relative_path: PathBuf::from("index.ts"),
            content: self
                .templates
                .render(templates::INDEX, &serde_json::json!({ "modules": modules }))?,
        });

        let contracts: Vec<ReadmeContractView> = context
            .bindings
            .iter()
            .map(|binding| {
                let interface = &binding.interface;
                let resolved = context
                    .addresses
                    .iter()
                    .find(|a| a.contract_name == binding.contract_name);
                ReadmeContractView {
                    name: binding.contract_name.clone(),
                    variable_name: binding.contract_name.to_case(Case::Camel),
                    address: resolved.map_or_else(|| PLACEHOLDER_ADDRESS.to_string(), |a| a.address.clone()),
                    is_placeholder: resolved.map_or(true, |a| a.is_placeholder),
                    read_count: interface.read_methods().count(),
                    write_count: interface.write_methods().count(),
                    event_count: interface.events.len(),
                    interface_path: Self::path_string(self.interface_path(&binding.contract_name)),
                    abi_path: Self::path_string(self.abi_path(&binding.contract_name)),
                    methods: interface.methods.iter().map(|m| self.method_line(m)).collect(),
                    events: interface.events.iter().map(|e| e.canonical_signature.clone()).collect(),
                    example_read: interface.read_methods().next().map(|m| string_literal(&m.name)),
                }
            })
            .collect();

        files.push(RenderedFile {
            relative_path: PathBuf::from("README.md"),
            content: self.templates.render(
                templates::README,
                &serde_json::json!({
                    "network": network_view(context.network),
                    "contracts": contracts,
                    "skipped": context.skipped,
                }),
            )?,
        });

        Ok(files)
    }
}

/// Raw values for prose, quoted literals for code
fn network_view(network: &NetworkConfig) -> serde_json::Value {
    serde_json::json!({
        "name": network.name,
        "name_literal": string_literal(&network.name),
        "chain_id": network.chain_id,
        "rpc_url": network.rpc_url,
        "rpc_url_literal": string_literal(&network.rpc_url),
    })
}

/// Double-quoted, escaped string literal. JSON string syntax is valid TypeScript.
fn string_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Escape parameter names that collide with reserved words
fn identifier(name: &str) -> String {
    if RESERVED_WORDS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}
