//! Discovery of CSV source files.
//!
//! The dashboard loads every `*.csv` found under the data directory, so
//! "which files" is decided here and nowhere else. Discovery is recursive to a
//! small fixed depth and the result is sorted for deterministic merge order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth for finding CSV files.
const SEARCH_DEPTH: usize = 4;

/// Find all CSV sources under `data_dir`.
///
/// Returns an input error (exit code 2) when the directory contains no CSV
/// files at all; an empty run is surfaced to the operator, never rendered as a
/// blank dashboard.
pub fn find_sources(data_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !data_dir.is_dir() {
        return Err(AppError::input(format!(
            "Data directory '{}' does not exist (use --data, or --demo for generated data).",
            data_dir.display()
        )));
    }

    let mut files = Vec::new();
    collect_csv_files(data_dir, SEARCH_DEPTH, &mut files);
    files.sort();

    if files.is_empty() {
        return Err(AppError::input(format!(
            "No .csv files found under '{}'.",
            data_dir.display()
        )));
    }

    Ok(files)
}

fn collect_csv_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                collect_csv_files(&path, depth - 1, out);
            }
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_input_error() {
        let err = find_sources(Path::new("/nonexistent/morsel-data")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
