//! `erdgen inspect` command - Print compiled metadata as JSON.
//!
//! Only the JSON value goes to stdout, so the output can be piped.

use erdgen_schema::MetadataIndex;

use crate::cli::InspectArgs;
use crate::config::Project;
use crate::error::{CliError, CliResult};

/// Run the inspect command
pub fn run(args: InspectArgs) -> CliResult<()> {
    let project = Project::load(args.config.as_deref())?;
    let schema_path = project.schema_path(args.schema.clone())?;
    let compilation = super::compile_with(&project, &schema_path)?;

    let index = MetadataIndex::new(&compilation.document);
    let value = index
        .get(
            &args.entity,
            args.field.as_deref(),
            args.attribute.as_deref(),
        )
        .ok_or_else(|| CliError::Command(format!("No metadata found for {}", describe(&args))))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn describe(args: &InspectArgs) -> String {
    [
        Some(args.entity.as_str()),
        args.field.as_deref(),
        args.attribute.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(".")
}
