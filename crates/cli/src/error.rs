use std::path::PathBuf;

/// Failures of the host shell itself. Problems in the Jack source are not
/// errors here; they come back as diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file argument that does not end in `.jack`.
    #[error("not a .jack file: {}", .0.display())]
    NotJack(PathBuf),

    #[error("no .jack files in directory '{}'", .0.display())]
    NoSources(PathBuf),

    #[error("error reading '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
