//! # erdgen
//!
//! Compiles decorated Mermaid entity-relationship diagrams into a canonical
//! schema document for downstream code generators.
//!
//! erdgen provides:
//! - A single-pass compiler for `erDiagram` text with `%% @tag payload`
//!   decorators (`@validate`, `@ui`, `@unique`, `@include`, `@show`, ...)
//! - Relationship-derived foreign keys and `@include` field copying
//! - YAML/JSON emission with a stable key order
//! - Case-insensitive metadata lookup and an optional consistency check
//!
//! ## Quick Start
//!
//! ```rust
//! use erdgen::prelude::*;
//!
//! let document = compile_schema(r#"
//! erDiagram
//!     User ||--o{ Account: ""
//!     User {
//!         ObjectId id
//!         String email %% @validate { required: true } @unique
//!     }
//!     Account {
//!         String name
//!     }
//! "#)?;
//!
//! let user = document.get_entity("User").unwrap();
//! assert!(user.get_field("_id").is_some());
//! assert_eq!(user.unique, vec![vec!["email"]]);
//!
//! let yaml = to_yaml(&document)?;
//! assert!(yaml.starts_with("relationships:"));
//! # Ok::<(), erdgen::SchemaError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema compilation, document types and helpers.
pub mod schema {
    pub use erdgen_schema::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::schema::emit::{to_json, to_yaml};
    pub use crate::schema::{
        Compilation, Compiler, CompilerOptions, Entity, Field, FieldType, MetadataIndex,
        SchemaConfig, SchemaDocument, compile_schema, compile_schema_file, validate_schema,
    };
}

// Re-export key types at the crate root
pub use schema::{SchemaDocument, SchemaError, SchemaResult};
