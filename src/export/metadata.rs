//! Hop connection metadata renderer
//!
//! Hop keeps database connections outside of pipelines, one JSON document per
//! connection under `<config>/metadata/rdbms/`. The renderer turns an
//! extracted [`ConnectionDefinition`] into that document through a
//! [`minijinja`] template.
//!
//! Templates are rendered with JSON auto-escaping, so `{{ name }}` produces a
//! quoted JSON string. Undefined variables are errors: a template that needs
//! `attributes.server` fails for a connection without a `<server>` element
//! instead of writing an incomplete file.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::convert::ConversionError;
use crate::export::TemplateError;
use crate::models::ConnectionDefinition;

/// Template shipped with the crate, producing Hop's rdbms metadata JSON.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/rdbms-metadata.json.j2");

const TEMPLATE_NAME: &str = "connection-metadata";

/// Values available to a metadata template.
#[derive(Debug, Serialize)]
pub struct MetadataContext<'a> {
    pub name: &'a str,
    pub type_id: &'a str,
    pub descriptor: &'a str,
    pub access_type: u8,
    pub attributes: &'a BTreeMap<String, String>,
    pub options: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a ConnectionDefinition> for MetadataContext<'a> {
    fn from(connection: &'a ConnectionDefinition) -> Self {
        Self {
            name: &connection.name,
            type_id: &connection.type_id,
            descriptor: &connection.descriptor,
            access_type: connection.access_type(),
            attributes: &connection.attributes,
            options: &connection.options,
        }
    }
}

/// Renders connection metadata files.
///
/// Built once before any file is processed and shared by every conversion.
#[derive(Debug)]
pub struct MetadataRenderer {
    env: Environment<'static>,
}

impl MetadataRenderer {
    /// Create a renderer from template source.
    ///
    /// Syntax errors in the template are reported here rather than per connection.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::Json);
        env.add_template_owned(TEMPLATE_NAME, template.into())
            .map_err(|e| TemplateError::SyntaxError(e.to_string()))?;
        Ok(Self { env })
    }

    /// Create a renderer using the built-in Hop rdbms template.
    pub fn with_default_template() -> Result<Self, TemplateError> {
        Self::new(DEFAULT_TEMPLATE)
    }

    /// Create a renderer from a template file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let template = std::fs::read_to_string(path).map_err(|e| {
            TemplateError::IoError(format!(
                "Failed to read template {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(template)
    }

    /// Render the metadata document for one connection.
    pub fn render(&self, connection: &ConnectionDefinition) -> Result<String, ConversionError> {
        let render_error = |e: minijinja::Error| ConversionError::RenderError {
            connection: connection.name.clone(),
            message: e.to_string(),
        };

        let template = self.env.get_template(TEMPLATE_NAME).map_err(render_error)?;
        let mut rendered = template
            .render(MetadataContext::from(connection))
            .map_err(render_error)?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_db() -> ConnectionDefinition {
        let mut connection = ConnectionDefinition::new("SalesDB", "MYSQL", "MySQL");
        for (key, value) in [
            ("server", "localhost"),
            ("database", "sales"),
            ("port", "3306"),
            ("username", "etl"),
            ("password", "Encrypted 2be98afc86aa7f2e4cb79ce10df90acde"),
            ("access", "JNDI"),
        ] {
            connection
                .attributes
                .insert(key.to_string(), value.to_string());
        }
        connection
            .options
            .insert("PORT_NUMBER".to_string(), "3306".to_string());
        connection
    }

    #[test]
    fn test_default_template_renders_hop_json() {
        let renderer = MetadataRenderer::with_default_template().unwrap();
        let rendered = renderer.render(&sales_db()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["name"], "SalesDB");
        let rdbms = &json["rdbms"]["MYSQL"];
        assert_eq!(rdbms["hostname"], "localhost");
        assert_eq!(rdbms["databaseName"], "sales");
        assert_eq!(rdbms["pluginName"], "MySQL");
        assert_eq!(rdbms["pluginId"], "MYSQL");
        assert_eq!(rdbms["port"], "3306");
        assert_eq!(rdbms["accessType"], 4);
        assert_eq!(rdbms["servername"], "");
        assert_eq!(rdbms["attributes"]["PORT_NUMBER"], "3306");
    }

    #[test]
    fn test_values_are_json_escaped() {
        let mut connection = sales_db();
        connection
            .attributes
            .insert("password".to_string(), "quote\" and \\ slash".to_string());
        let renderer = MetadataRenderer::with_default_template().unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&renderer.render(&connection).unwrap()).unwrap();
        assert_eq!(json["rdbms"]["MYSQL"]["password"], "quote\" and \\ slash");
    }

    #[test]
    fn test_empty_options_render_valid_json() {
        let mut connection = sales_db();
        connection.options.clear();
        let renderer = MetadataRenderer::with_default_template().unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&renderer.render(&connection).unwrap()).unwrap();
        assert!(json["rdbms"]["MYSQL"]["attributes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_missing_placeholder_is_render_error() {
        let mut connection = sales_db();
        connection.attributes.remove("server");
        let renderer = MetadataRenderer::with_default_template().unwrap();

        let err = renderer.render(&connection).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::RenderError { ref connection, .. } if connection == "SalesDB"
        ));
    }

    #[test]
    fn test_custom_template() {
        let renderer = MetadataRenderer::new("{{ name }}={{ descriptor }}").unwrap();
        assert_eq!(renderer.render(&sales_db()).unwrap(), "\"SalesDB\"=\"MySQL\"\n");
    }

    #[test]
    fn test_template_syntax_error_at_construction() {
        let err = MetadataRenderer::new("{{ name ").unwrap_err();
        assert!(matches!(err, TemplateError::SyntaxError(_)));
    }
}
