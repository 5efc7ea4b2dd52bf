//! # erdgen-schema
//!
//! Compiler from decorated Mermaid entity-relationship diagrams to a
//! canonical schema document.
//!
//! This crate provides:
//! - A line-oriented parser for `erDiagram` text with `%% @tag payload`
//!   decorators
//! - The canonical document types consumed by code generators
//! - Configuration parsing for `erdgen.toml` files
//! - YAML/JSON emission, case-insensitive metadata lookup and validation
//!
//! ## Example
//!
//! ```rust
//! use erdgen_schema::{compile_schema, FieldType};
//!
//! let doc = compile_schema(r#"
//! erDiagram
//!     User ||--o{ Account: ""
//!     User {
//!         String email %% @validate { required: true } @unique
//!     }
//!     Account {
//!         String name
//!     }
//! "#).unwrap();
//!
//! let account = doc.get_entity("Account").unwrap();
//! assert_eq!(account.get_field("userId").unwrap().field_type, Some(FieldType::ObjectId));
//! ```

mod assembler;
mod builder;

pub mod ast;
pub mod config;
pub mod decorator;
pub mod emit;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod validator;

pub use ast::*;
pub use builder::Placement;
pub use config::{CompilerOptions, OutputFormat, SchemaConfig};
pub use error::{CompileWarning, SchemaError, SchemaResult, WarningKind};
pub use metadata::{DictionaryRef, MetadataIndex};
pub use parser::{Compilation, Compiler, compile_schema, compile_schema_file};
pub use validator::{Validator, validate_schema};
