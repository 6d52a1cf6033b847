//! SHA-256 provenance checksums of source files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Buffer size for reading files during checksum computation.
const BUFFER_SIZE: usize = 65536; // 64 KB

/// Compute the lowercase hex SHA-256 of a file.
pub fn compute_file_sha256(path: &Path) -> Result<String> {
    let read_error = |e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = hex::encode(hasher.finalize());
    debug!(file = %path.display(), sha256 = %digest, "computed checksum");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"Hello, World!").expect("write");

        assert_eq!(
            compute_file_sha256(&path).expect("checksum"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = compute_file_sha256(&dir.path().join("absent.xml")).expect_err("absent");
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
