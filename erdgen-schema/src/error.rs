//! Error and warning types for schema compilation.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while compiling or validating a schema.
///
/// Every variant except [`SchemaError::ValidationFailed`] aborts a
/// compilation; no partial document is produced.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(erdgen::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A decorator payload is not a well-formed structured literal.
    #[error("malformed `@{tag}` payload on line {line}: `{text}`")]
    #[diagnostic(
        code(erdgen::schema::malformed_payload),
        help("decorator payloads use JSON5 syntax, e.g. `{{ required: true }}`")
    )]
    MalformedPayload {
        tag: String,
        text: String,
        line: usize,
        message: String,
    },

    /// An `@include` names an entity that has not been declared yet.
    #[error("entity `{entity}` includes unknown entity `{abstraction}` on line {line}")]
    #[diagnostic(
        code(erdgen::schema::unknown_abstraction),
        help("declare the abstraction entity before the entities that include it")
    )]
    UnknownAbstraction {
        entity: String,
        abstraction: String,
        line: usize,
    },

    /// A `@service` payload omits a field the service registry requires.
    #[error("service `{service}` on entity `{entity}` is missing required field `{field}`")]
    #[diagnostic(code(erdgen::schema::service_requirement))]
    ServiceRequirement {
        entity: String,
        service: String,
        field: String,
    },

    /// Invalid entity definition.
    #[error("invalid entity `{name}`: {message}")]
    #[diagnostic(code(erdgen::schema::invalid_entity))]
    InvalidEntity { name: String, message: String },

    /// Invalid field definition.
    #[error("invalid field `{entity}.{field}`: {message}")]
    #[diagnostic(code(erdgen::schema::invalid_field))]
    InvalidField {
        entity: String,
        field: String,
        message: String,
    },

    /// Invalid relationship.
    #[error("invalid relationship `{source_entity}` -> `{target}`: {message}")]
    #[diagnostic(code(erdgen::schema::invalid_relationship))]
    InvalidRelationship {
        source_entity: String,
        target: String,
        message: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(erdgen::schema::config_error))]
    ConfigError { message: String },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(erdgen::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// The compiled document could not be serialized or read back.
    #[error("failed to serialize schema document: {message}")]
    #[diagnostic(code(erdgen::schema::serialize_error))]
    SerializeError { message: String },

    /// Validation error with multiple issues.
    #[error("schema validation failed with {count} error(s)")]
    #[diagnostic(code(erdgen::schema::validation_failed))]
    ValidationFailed {
        count: usize,
        #[related]
        errors: Vec<SchemaError>,
    },
}

impl SchemaError {
    /// Create a malformed payload error.
    pub fn malformed_payload(
        tag: impl Into<String>,
        text: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedPayload {
            tag: tag.into(),
            text: text.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an unknown abstraction error.
    pub fn unknown_abstraction(
        entity: impl Into<String>,
        abstraction: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::UnknownAbstraction {
            entity: entity.into(),
            abstraction: abstraction.into(),
            line,
        }
    }

    /// Create an invalid entity error.
    pub fn invalid_entity(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntity {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid relationship error.
    pub fn invalid_relationship(
        source: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRelationship {
            source_entity: source.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised by the compiler rather than the validator.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidEntity { .. }
                | Self::InvalidField { .. }
                | Self::InvalidRelationship { .. }
                | Self::ValidationFailed { .. }
        )
    }
}

/// Category of a non-fatal compilation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A field `@ui` payload used an attribute outside the allow-list.
    UnsupportedUiAttribute,
    /// A field `@ui` payload used a value outside an attribute's value set.
    UnsupportedUiValue,
    /// A `@show` display group lacks `displayPages` or `fields`.
    IncompleteDisplayInfo,
    /// A payload decoded fine but has the wrong shape for its decorator.
    UnexpectedPayload,
    /// A dictionary entry whose value is not a scalar.
    NonScalarDictionaryValue,
    /// A directive used somewhere its scope does not allow.
    MisplacedDirective,
    /// An inline `@tag` that is not part of the directive vocabulary.
    UnknownDirective,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UnsupportedUiAttribute => "unsupported ui attribute",
            Self::UnsupportedUiValue => "unsupported ui value",
            Self::IncompleteDisplayInfo => "incomplete display info",
            Self::UnexpectedPayload => "unexpected payload",
            Self::NonScalarDictionaryValue => "non-scalar dictionary value",
            Self::MisplacedDirective => "misplaced directive",
            Self::UnknownDirective => "unknown directive",
        };
        write!(f, "{}", s)
    }
}

/// A non-fatal finding. The offending decorator (or sub-clause) was dropped
/// and compilation continued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    /// 1-based source line.
    pub line: usize,
    /// Finding category.
    pub kind: WarningKind,
    /// Human readable detail.
    pub message: String,
}

impl CompileWarning {
    /// Create a new warning.
    pub fn new(line: usize, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}
