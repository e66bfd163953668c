use std::path::Path;

use jack_core::{compile, lex, serialize, tokens_to_xml};

use super::diagnostics_report;
use crate::error::CliError;
use crate::{sources, OutputFormat, Status};

fn load(file: &Path) -> Result<String, CliError> {
    if !file.exists() {
        return Err(CliError::NotFound(file.to_path_buf()));
    }
    sources::read(file)
}

/// Token stream on stdout. Lexical errors are not reported here; `check`
/// or `parse` surfaces them.
pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat) -> Result<Status, CliError> {
    let src = load(file)?;
    let tokens = lex(&src);
    match output {
        OutputFormat::Text => print!("{}", tokens_to_xml(&tokens)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
    }
    Ok(Status::Clean)
}

/// Parse tree on stdout, diagnostics on stderr.
pub(crate) fn cmd_parse(
    file: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<Status, CliError> {
    let src = load(file)?;
    let result = compile(&src);
    match output {
        OutputFormat::Text => print!("{}", result.to_xml()),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serialize::to_json(&result.tree))?
            );
        }
    }
    if !result.has_errors() {
        return Ok(Status::Clean);
    }
    if !quiet {
        eprint!("{}", diagnostics_report(file, &result, output));
    }
    Ok(Status::Diagnostics)
}
