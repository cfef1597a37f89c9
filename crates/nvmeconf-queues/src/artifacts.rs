use std::path::{Path, PathBuf};

/// Provides paths for named diagnostic dumps.
///
/// Dump files exist purely as post-mortem evidence; nothing in the harness
/// reads them back or branches on their contents.
pub trait ArtifactStore {
    /// Path for a dump identified by `group.test.category.qualifier`.
    fn prep_dump_file(&self, group: &str, test: &str, category: &str, qualifier: &str) -> PathBuf;
}

/// Flat directory of dump files following the `group.test.category.qualifier`
/// naming convention.
#[derive(Debug, Clone)]
pub struct DumpDir {
    root: PathBuf,
}

impl DumpDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for DumpDir {
    fn prep_dump_file(&self, group: &str, test: &str, category: &str, qualifier: &str) -> PathBuf {
        self.root.join(format!("{group}.{test}.{category}.{qualifier}"))
    }
}
