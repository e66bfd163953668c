mod analyze;
mod inspect;

pub(crate) use analyze::{cmd_analyze, cmd_check, AnalyzeOptions};
pub(crate) use inspect::{cmd_parse, cmd_tokens};

use std::path::Path;

use jack_core::CompilationResult;

use crate::OutputFormat;

/// Per-unit diagnostic report. Text mode prints one `file:line:col` line
/// per diagnostic followed by the classic summary line.
pub(crate) fn diagnostics_report(
    file: &Path,
    result: &CompilationResult,
    output: OutputFormat,
) -> String {
    match output {
        OutputFormat::Text => {
            let mut out = String::new();
            for d in &result.diagnostics {
                out.push_str(&format!("{}:{}\n", file.display(), d));
            }
            if let Some(summary) = result.summary() {
                out.push_str(&format!("{}: {}\n", file.display(), summary));
            }
            out
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "file": file.display().to_string(),
                "ok": !result.has_errors(),
                "diagnostics": result
                    .diagnostics
                    .iter()
                    .map(|d| d.to_json_value())
                    .collect::<Vec<_>>(),
            });
            format!("{}\n", json)
        }
    }
}
