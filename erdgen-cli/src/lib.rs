//! erdgen CLI - Command-line interface for the erdgen schema compiler.
//!
//! This crate provides the `erdgen` binary, which compiles decorated
//! Mermaid diagrams, validates them and inspects compiled metadata.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
