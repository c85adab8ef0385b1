//! # File I/O Module
//!
//! Reads design inputs and settings from JSON files and writes exported
//! reports safely:
//! - **Atomic writes**: Write to .tmp, sync, rename to prevent partial files
//! - **Structured errors**: Every failure names the operation and path
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::file_io::{load_design_input, load_settings, write_atomic};
//! use std::path::Path;
//!
//! let input = load_design_input(Path::new("route9.json")).unwrap();
//! let settings = load_settings(Path::new("settings.json")).unwrap();
//!
//! write_atomic(Path::new("route9.txt"), b"report").unwrap();
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::calculations::design::PavementDesignInput;
use crate::errors::{CalcError, CalcResult};
use crate::settings::DesignSettings;

/// Load a design input file.
///
/// # Returns
///
/// * `Ok(PavementDesignInput)` - Successfully parsed input
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_design_input(path: &Path) -> CalcResult<PavementDesignInput> {
    load_json(path)
}

/// Load a settings file. Missing fields take their defaults.
pub fn load_settings(path: &Path) -> CalcResult<DesignSettings> {
    let settings: DesignSettings = load_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Read and parse a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Write `bytes` to `path` via a temp file and rename.
///
/// The temp file sits next to the target (`<name>.tmp`), so the rename stays
/// on one filesystem. The temp file is removed if any step fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);
    let result = write_then_rename(&tmp_path, path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(tmp_path, path).map_err(|e| {
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// `report.pdf` -> `report.pdf.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("pave_core_test_{}", name))
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(tmp_path_for(Path::new("/out/report.pdf")), Path::new("/out/report.pdf.tmp"));
        assert_eq!(tmp_path_for(Path::new("report")), Path::new("report.tmp"));
    }

    #[test]
    fn test_input_roundtrip() {
        let path = temp_path("input_roundtrip.json");
        let input = PavementDesignInput {
            label: "Route 9".to_string(),
            ..PavementDesignInput::default()
        };

        let json = serde_json::to_string_pretty(&input).unwrap();
        write_atomic(&path, json.as_bytes()).unwrap();
        let loaded = load_design_input(&path).unwrap();
        assert_eq!(loaded, input);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let path = temp_path("atomic.txt");
        write_atomic(&path, b"SN = 3.11").unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "SN = 3.11");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_removes_tmp_file() {
        // Renaming a file onto an existing directory fails
        let path = temp_path("atomic_target_dir");
        fs::create_dir_all(&path).unwrap();

        let err = write_atomic(&path, b"SN = 3.11").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!tmp_path_for(&path).exists());
        assert!(path.is_dir());

        let _ = fs::remove_dir(&path);
    }

    #[test]
    fn test_missing_directory_leaves_nothing() {
        let path = temp_path("no_such_dir").join("report.txt");
        let err = write_atomic(&path, b"report").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!tmp_path_for(&path).exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_defaults_from_partial_file() {
        let path = temp_path("partial_settings.json");
        write_atomic(&path, br#"{ "minimums": { "asphalt_in": 4.0 } }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.minimums.asphalt_in, 4.0);
        assert_eq!(settings.minimums.base_in, 6.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let path = temp_path("bad_settings.json");
        write_atomic(&path, br#"{ "solver": { "tolerance": -1.0 } }"#).unwrap();

        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.field(), Some("solver.tolerance"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_design_input(&temp_path("does_not_exist.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_path("invalid.json");
        write_atomic(&path, b"{ not json").unwrap();

        let err = load_design_input(&path).unwrap_err();
        assert!(matches!(err, CalcError::SerializationError { .. }));

        let _ = fs::remove_file(&path);
    }
}
