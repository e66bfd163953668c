use std::path::Path;

use jack_core::{compile_with, CompilationResult, ParseOptions};

use super::diagnostics_report;
use crate::error::CliError;
use crate::{sources, OutputFormat, Status};

pub(crate) struct AnalyzeOptions<'a> {
    pub out_dir: Option<&'a Path>,
    pub tokens: bool,
    pub max_errors: usize,
}

/// Analyze every unit under `path` and write its tree (and optionally its
/// token stream) next to the source or into `out_dir`. Every unit is
/// attempted even when an earlier one has diagnostics; I/O failures stop
/// the run.
pub(crate) fn cmd_analyze(
    path: &Path,
    opts: &AnalyzeOptions<'_>,
    output: OutputFormat,
    quiet: bool,
) -> Result<Status, CliError> {
    let files = sources::collect(path)?;
    let parse_opts = ParseOptions {
        max_errors: opts.max_errors,
    };
    let mut status = Status::Clean;

    for file in &files {
        let result = analyze_file(file, &parse_opts)?;

        let tree_path = sources::output_path(file, opts.out_dir, "");
        sources::write(&tree_path, &result.to_xml())?;
        tracing::info!(out = %tree_path.display(), "wrote parse tree");
        if opts.tokens {
            let tokens_path = sources::output_path(file, opts.out_dir, "T");
            sources::write(&tokens_path, &result.tokens_to_xml())?;
            tracing::info!(out = %tokens_path.display(), "wrote token stream");
        }

        if result.has_errors() {
            status = Status::Diagnostics;
        }
        if !quiet {
            match (output, result.has_errors()) {
                (OutputFormat::Text, false) => println!("{}: ok", file.display()),
                _ => print!("{}", diagnostics_report(file, &result, output)),
            }
        }
    }
    Ok(status)
}

/// Diagnostics only; nothing is written.
pub(crate) fn cmd_check(
    path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<Status, CliError> {
    let files = sources::collect(path)?;
    let mut failed = 0usize;

    for file in &files {
        let result = analyze_file(file, &ParseOptions::default())?;
        if result.has_errors() {
            failed += 1;
        }
        if !quiet && (result.has_errors() || output == OutputFormat::Json) {
            print!("{}", diagnostics_report(file, &result, output));
        }
    }

    if !quiet && output == OutputFormat::Text {
        println!("{} file(s) checked, {} with errors", files.len(), failed);
    }
    Ok(if failed == 0 {
        Status::Clean
    } else {
        Status::Diagnostics
    })
}

fn analyze_file(file: &Path, opts: &ParseOptions) -> Result<CompilationResult, CliError> {
    let src = sources::read(file)?;
    let result = compile_with(&src, opts);
    tracing::debug!(
        file = %file.display(),
        tokens = result.tokens.len(),
        diagnostics = result.diagnostics.len(),
        "analyzed"
    );
    Ok(result)
}
