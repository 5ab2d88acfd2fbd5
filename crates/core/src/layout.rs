use std::path::{Path, PathBuf};

use crate::suite::render::sanitize_suite_name;

/// Logical layout of a run's output directory.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself;
/// the CLI is responsible for creating directories and writing files.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Root directory of the run outputs.
    pub root: PathBuf,
    /// Persisted function inventory listing.
    pub listing_path: PathBuf,
    /// Suite descriptor as JSON.
    pub descriptor_path: PathBuf,
    /// Run manifest (hashes, counts, timestamps).
    pub metadata_path: PathBuf,
}

impl OutputLayout {
    /// Compute the default layout for outputs rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let listing_path = root.join("functions.txt");
        let descriptor_path = root.join("suite.json");
        let metadata_path = root.join("run_metadata.json");
        Self { root, listing_path, descriptor_path, metadata_path }
    }

    /// Path of the rendered suite source, e.g. `SmbDifferentialTest.rs`.
    pub fn suite_path(&self, suite_name: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", suite_file_stem(suite_name), extension))
    }

    /// Every file a run writes under `root`, given the rendered suite's path.
    pub fn artifact_paths(&self, suite_path: &Path) -> [PathBuf; 4] {
        [
            self.listing_path.clone(),
            self.descriptor_path.clone(),
            self.metadata_path.clone(),
            suite_path.to_path_buf(),
        ]
    }
}

/// File stem for a rendered suite; matches the generated Kotlin class name.
pub fn suite_file_stem(suite_name: &str) -> String {
    format!("{}DifferentialTest", sanitize_suite_name(suite_name))
}
