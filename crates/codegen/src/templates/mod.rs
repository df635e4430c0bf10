//! Template system for binding generation
//!
//! Contains the Handlebars templates for the static boilerplate of every generated file.

use bindgen_common::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

pub const CONTRACT_INTERFACE: &str = "contract_interface";
pub const TYPES: &str = "types";
pub const ADDRESSES: &str = "addresses";
pub const CONFIG: &str = "config";
pub const INDEX: &str = "index";
pub const README: &str = "readme";

/// Template manager for TypeScript binding generation
pub struct TemplateManager {
    handlebars: Handlebars<'static>,
}

impl TemplateManager {
    /// Create a new template manager and register all templates
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Generated code is not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        Self::register_templates(&mut handlebars)?;

        Ok(Self { handlebars })
    }

    fn register_templates(handlebars: &mut Handlebars) -> Result<()> {
        let templates = [
            (CONTRACT_INTERFACE, include_str!("contract_interface.hbs")),
            (TYPES, include_str!("types.hbs")),
            (ADDRESSES, include_str!("addresses.hbs")),
            (CONFIG, include_str!("config.hbs")),
            (INDEX, include_str!("index.hbs")),
            (README, include_str!("readme.hbs")),
        ];

        for (name, source) in templates {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| Error::template(format!("Failed to register {} template: {}", name, e)))?;
        }

        Ok(())
    }

    /// Render a template with the given data
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| Error::template(format!("Failed to render template {}: {}", template_name, e)))
    }

    /// Get list of available templates
    pub fn available_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_registered() {
        let manager = TemplateManager::new().unwrap();
        assert_eq!(
            manager.available_templates(),
            vec!["addresses", "config", "contract_interface", "index", "readme", "types"]
        );
    }

    #[test]
    fn test_render_does_not_escape() {
        let manager = TemplateManager::new().unwrap();
        let rendered = manager
            .render(INDEX, &json!({ "modules": ["contracts/RegistrationContract"] }))
            .unwrap();
        assert!(rendered.contains(r#"export * from "./contracts/RegistrationContract";"#));
    }

    #[test]
    fn test_unknown_template() {
        let manager = TemplateManager::new().unwrap();
        assert!(matches!(manager.render("missing", &json!({})), Err(Error::Template(_))));
    }
}
