//! Input file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Lists the files in `dir` whose extension matches one of `extensions`.
///
/// Extensions are compared case-insensitively and given without the dot.
/// Subdirectories are not descended into. Returns files sorted by filename.
pub fn scan_for_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = files.len(), "scanned input directory");

    Ok(files)
}

/// The identifier used for a source file: its stem, e.g. `sample_e2b_001`.
pub fn file_id_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_is_the_stem() {
        assert_eq!(file_id_for(Path::new("/in/sample_e2b_001.xml")), "sample_e2b_001");
        assert_eq!(file_id_for(Path::new("report.v2.json")), "report.v2");
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = scan_for_files(Path::new("/definitely/not/here"), &["xml"])
            .expect_err("missing dir");
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
