//! Temporary input files for tests.

use std::io::Write;
use std::path::PathBuf;

/// A temporary directory holding a single written file.
///
/// The directory is removed when this value is dropped.
pub struct TempInput {
    _dir: tempfile::TempDir,
    pub path: PathBuf,
}

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_temp_file(name: &str, contents: &str) -> TempInput {
    let dir = tempfile::Builder::new()
        .prefix("crs_test")
        .tempdir()
        .expect("Failed to create temporary test directory");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create test file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write test file");
    TempInput { _dir: dir, path }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_temp_file() {
        let input = write_temp_file("grid_mapping.json", "{}");
        assert!(input.path.exists());
        assert_eq!(std::fs::read_to_string(&input.path).unwrap(), "{}");

        let path = input.path.clone();
        drop(input);
        assert!(!path.exists());
    }
}
