//! Locating and loading `.jack` compilation units.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const SOURCE_EXTENSION: &str = "jack";

pub fn is_jack_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Expand `path` into the compilation units it names: the file itself, or
/// every `.jack` file directly inside a directory, sorted by name.
pub fn collect(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        if !is_jack_file(path) {
            return Err(CliError::NotJack(path.to_path_buf()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let p = entry.path();
        if p.is_file() && is_jack_file(&p) {
            files.push(p);
        }
    }
    if files.is_empty() {
        return Err(CliError::NoSources(path.to_path_buf()));
    }
    files.sort();
    tracing::debug!(dir = %path.display(), count = files.len(), "collected sources");
    Ok(files)
}

pub fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Where the output for `source` goes: `<stem><suffix>.xml`, in `out_dir`
/// when given, otherwise beside the source.
pub fn output_path(source: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}.xml", stem, suffix);
    match out_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

pub fn write(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_beside_source() {
        let p = output_path(Path::new("proj/Main.jack"), None, "");
        assert_eq!(p, PathBuf::from("proj/Main.xml"));
        let t = output_path(Path::new("proj/Main.jack"), None, "T");
        assert_eq!(t, PathBuf::from("proj/MainT.xml"));
    }

    #[test]
    fn output_into_directory() {
        let p = output_path(Path::new("proj/Main.jack"), Some(Path::new("out")), "");
        assert_eq!(p, PathBuf::from("out/Main.xml"));
    }

    #[test]
    fn extension_check() {
        assert!(is_jack_file(Path::new("a/Main.jack")));
        assert!(!is_jack_file(Path::new("a/Main.vm")));
        assert!(!is_jack_file(Path::new("a/jack")));
    }

    #[test]
    fn missing_path_is_not_found() {
        let err = collect(Path::new("definitely/not/here.jack")).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }
}
