//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use erdgen_schema::OutputFormat;
use std::path::PathBuf;

/// erdgen - Compile decorated Mermaid ER diagrams into schema documents
#[derive(Parser, Debug)]
#[command(name = "erdgen")]
#[command(author = "erdgen contributors")]
#[command(version)]
#[command(
    about = "erdgen - Compile decorated Mermaid ER diagrams into schema documents",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (overrides ERDGEN_LOG_LEVEL)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a diagram into a canonical schema document
    Compile(CompileArgs),

    /// Compile a diagram and run consistency checks
    Validate(ValidateArgs),

    /// Look up entity, field or attribute metadata in a diagram
    Inspect(InspectArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Compile Command
// =============================================================================

/// Arguments for the `compile` command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the diagram (defaults to `schema.path` from erdgen.toml)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Output file (defaults to `schema.output` from erdgen.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<FormatArg>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Output formats accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

// =============================================================================
// Validate Command
// =============================================================================

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the diagram (defaults to `schema.path` from erdgen.toml)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

// =============================================================================
// Inspect Command
// =============================================================================

/// Arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Entity name (case-insensitive)
    pub entity: String,

    /// Field name (case-insensitive)
    pub field: Option<String>,

    /// Dotted attribute path, e.g. `pattern.regex`
    pub attribute: Option<String>,

    /// Path to the diagram (defaults to `schema.path` from erdgen.toml)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
