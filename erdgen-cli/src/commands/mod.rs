//! CLI command implementations.

pub mod compile;
pub mod inspect;
pub mod validate;
pub mod version;

use erdgen_schema::{Compilation, Compiler};
use std::path::Path;

use crate::config::Project;
use crate::error::CliResult;
use crate::output;

/// Compile a diagram with the project's compiler options.
pub(crate) fn compile_with(project: &Project, schema_path: &Path) -> CliResult<Compilation> {
    let compiler = Compiler::new(project.config.compiler_options());
    Ok(compiler.compile_file(schema_path)?)
}

/// Print compile warnings, if any.
pub(crate) fn report_warnings(compilation: &Compilation) {
    if compilation.warnings.is_empty() {
        return;
    }
    output::newline();
    output::section("Warnings");
    for warning in &compilation.warnings {
        output::warn(&warning.to_string());
    }
}
