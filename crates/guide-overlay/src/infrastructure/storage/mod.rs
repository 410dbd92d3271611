//! Step-script loading from disk.
//!
//! A tour is described by a JSON file passed on the command line.  This
//! module reads the file and hands the text to `guide_core::parse_script`,
//! which owns the schema and its leniency rules.

use std::path::{Path, PathBuf};

use thiserror::Error;

use guide_core::{parse_script, ScriptError, TourScript};

/// Error type for step-script file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error reading script at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content was not a usable tour script.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Loads and parses the tour script at `path`.
///
/// # Errors
///
/// Returns [`StorageError::Io`] when the file cannot be read, and
/// [`StorageError::Script`] when the content is not valid JSON or describes
/// an empty tour.
pub fn load_script(path: &Path) -> Result<TourScript, StorageError> {
    let content = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_script(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_script_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "guide_test_{}_{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_script_reads_valid_file() {
        // Arrange
        let dir = temp_script_dir();
        let path = dir.join("tour.json");
        std::fs::write(
            &path,
            r#"{"steps": [{"items": [], "action": {"type": "type", "text": "ok"}}]}"#,
        )
        .unwrap();

        // Act
        let script = load_script(&path).expect("valid file should load");

        // Assert
        assert_eq!(script.len(), 1);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_script_missing_file_is_io_error() {
        // Arrange
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/tour.json");

        // Act
        let result = load_script(&path);

        // Assert
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_load_script_invalid_json_is_script_error() {
        // Arrange
        let dir = temp_script_dir();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{{{ not json").unwrap();

        // Act
        let result = load_script(&path);

        // Assert
        assert!(matches!(result, Err(StorageError::Script(_))));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_script_empty_tour_is_rejected() {
        // Arrange
        let dir = temp_script_dir();
        let path = dir.join("empty.json");
        std::fs::write(&path, r#"{"steps": []}"#).unwrap();

        // Act
        let result = load_script(&path);

        // Assert
        assert!(matches!(
            result,
            Err(StorageError::Script(ScriptError::NoSteps))
        ));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }
}
