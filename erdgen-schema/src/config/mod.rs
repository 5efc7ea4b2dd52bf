//! Configuration file parsing for `erdgen.toml`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::path::Path;

use crate::ast::FieldType;
use crate::error::{SchemaError, SchemaResult};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "erdgen.toml";

/// Main configuration structure for `erdgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Input/output locations.
    #[serde(default)]
    pub schema: SchemaSection,

    /// Compiler behaviour.
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Service registry, keyed by service name.
    #[serde(default)]
    pub services: IndexMap<String, ServiceDefinition>,
}

impl SchemaConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SchemaError::TomlError { source: e })?;
        config.check()?;
        Ok(config)
    }

    /// Build the options handed to the compiler.
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            identity_key: SmolStr::new(&self.compiler.identity_key),
            reference_type: FieldType::from_name(&self.compiler.reference_type),
            services: self
                .services
                .iter()
                .map(|(name, def)| (SmolStr::new(name), def.clone()))
                .collect(),
        }
    }

    fn check(&self) -> SchemaResult<()> {
        if self.compiler.identity_key.trim().is_empty() {
            return Err(SchemaError::ConfigError {
                message: "compiler.identity_key must not be empty".to_string(),
            });
        }
        if self.compiler.reference_type.trim().is_empty() {
            return Err(SchemaError::ConfigError {
                message: "compiler.reference_type must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Schema file locations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSection {
    /// Path to the diagram.
    #[serde(default = "default_schema_path")]
    pub path: String,

    /// Path of the compiled document.
    #[serde(default = "default_output")]
    pub output: String,

    /// Output format of the compiled document.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for SchemaSection {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
            output: default_output(),
            format: OutputFormat::default(),
        }
    }
}

fn default_schema_path() -> String {
    "schema.mmd".to_string()
}

fn default_output() -> String {
    "schema.yaml".to_string()
}

/// Serialization format of the compiled document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML (default).
    #[default]
    Yaml,
    /// Pretty printed JSON.
    Json,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Compiler section of the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// Name every `id` field is normalized to.
    #[serde(default = "default_identity_key")]
    pub identity_key: String,

    /// Type of injected foreign key fields.
    #[serde(default = "default_reference_type")]
    pub reference_type: String,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            identity_key: default_identity_key(),
            reference_type: default_reference_type(),
        }
    }
}

fn default_identity_key() -> String {
    "_id".to_string()
}

fn default_reference_type() -> String {
    "ObjectId".to_string()
}

/// A service known to the registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDefinition {
    /// Fields a `@service` payload must list for this service.
    #[serde(default)]
    pub required_fields: Vec<String>,
}

/// Options that influence compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOptions {
    /// Name every `id` field is normalized to.
    pub identity_key: SmolStr,
    /// Type of injected foreign key fields.
    pub reference_type: FieldType,
    /// Service registry.
    pub services: IndexMap<SmolStr, ServiceDefinition>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        SchemaConfig::default().compiler_options()
    }
}

impl CompilerOptions {
    /// Normalize a field name; any case of `id` becomes the identity key.
    pub fn normalize_field_name(&self, name: &str) -> SmolStr {
        if name.eq_ignore_ascii_case("id") {
            self.identity_key.clone()
        } else {
            SmolStr::new(name)
        }
    }
}
