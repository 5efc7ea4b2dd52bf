//! `erdgen validate` command - Compile a diagram and check its consistency.

use erdgen_schema::{SchemaError, Validator};

use crate::cli::ValidateArgs;
use crate::config::Project;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the validate command
pub fn run(args: ValidateArgs) -> CliResult<()> {
    output::header("Validate Schema");

    let project = Project::load(args.config.as_deref())?;
    let schema_path = project.schema_path(args.schema)?;

    if let Some(source) = &project.source {
        output::info(&format!("Using config {}", source.display()));
    }
    output::kv("Schema", &schema_path.display().to_string());
    output::newline();

    output::step(1, 2, "Compiling diagram...");
    let compilation = super::compile_with(&project, &schema_path)?;

    output::step(2, 2, "Running validation checks...");
    let result = Validator::new().validate(compilation.document.clone());

    super::report_warnings(&compilation);
    output::newline();

    let document = match result {
        Ok(document) => document,
        Err(SchemaError::ValidationFailed { count, errors }) => {
            output::error("Schema validation failed!");
            output::newline();
            output::section("Errors");
            for error in &errors {
                output::list_item(&error.to_string());
            }
            return Err(CliError::Validation(format!(
                "Found {} validation errors",
                count
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if compilation.warnings.is_empty() {
        success("Schema is valid!");
    } else {
        success(&format!(
            "Schema is valid with {} warnings",
            compilation.warnings.len()
        ));
    }
    output::newline();

    output::section("Schema Summary");
    output::kv("Entities", &document.entities.len().to_string());
    output::kv(
        "Abstract",
        &document
            .entities
            .values()
            .filter(|e| e.is_abstract)
            .count()
            .to_string(),
    );
    output::kv("Total Fields", &document.field_count().to_string());
    output::kv("Relationships", &document.relationships.len().to_string());
    output::kv("Dictionaries", &document.dictionaries.len().to_string());
    output::kv("Services", &document.services.len().to_string());

    Ok(())
}
