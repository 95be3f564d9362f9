#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const HEADER: &str = "Country,Code,Calling Code,Year,CO2 emission (Tons),Population(2022),Area,% of World,Density(km2)";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Writes a dataset made of the standard header followed by `rows`.
    pub fn write_dataset(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents.push('\n');
        self.write(name, contents.as_bytes())
    }
}
