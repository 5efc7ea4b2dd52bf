//! `erdgen compile` command - Compile a diagram into a schema document.

use erdgen_schema::OutputFormat;
use erdgen_schema::emit;

use crate::cli::CompileArgs;
use crate::config::Project;
use crate::error::CliResult;
use crate::output::{self, success};

/// Run the compile command
pub fn run(args: CompileArgs) -> CliResult<()> {
    output::header("Compile Schema");

    let project = Project::load(args.config.as_deref())?;
    let schema_path = project.schema_path(args.schema)?;
    let output_path = project.output_path(args.output);
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(project.config.schema.format);

    if let Some(source) = &project.source {
        output::info(&format!("Using config {}", source.display()));
    }
    output::kv("Schema", &schema_path.display().to_string());
    output::kv("Output", &output_path.display().to_string());
    output::kv("Format", format.extension());
    output::newline();

    output::step(1, 2, "Compiling diagram...");
    let compilation = super::compile_with(&project, &schema_path)?;

    output::step(2, 2, "Writing document...");
    let rendered = emit::render(&compilation.document, format)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, rendered)?;

    super::report_warnings(&compilation);
    output::newline();
    success(&format!(
        "Compiled {} entities to {}",
        compilation.document.entities.len(),
        output_path.display()
    ));

    Ok(())
}
