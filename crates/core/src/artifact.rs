use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Index file sitting next to the artifacts in the build directory.
pub const INDEX_FILE: &str = "index.json";

/// Per-project metadata directory.
pub const META_DIR: &str = ".delfx";

/// The build directory under a project root (`<project>/.delfx/build`).
pub fn build_dir(project_root: &Path) -> PathBuf {
    project_root.join(META_DIR).join("build")
}

/// Compose the canonical artifact filename for a build.
///
/// Lookups always compose this name rather than parsing filenames apart, so
/// underscores in project or branch names are harmless.
pub fn artifact_file_name(project: &str, branch: &str, commit: &str) -> String {
    format!("{project}_{branch}_{commit}.tar")
}

/// One recorded build artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub project: String,
    pub branch: String,
    pub commit: String,
    pub file: String,
    pub created_at: DateTime<Utc>,
}

/// Explicit (project, branch, commit) → artifact mapping persisted as
/// `index.json` in the build directory.
#[derive(Debug)]
pub struct ArtifactIndex {
    dir: PathBuf,
    records: Vec<ArtifactRecord>,
}

impl ArtifactIndex {
    /// Load the index for a build directory. A missing directory or index
    /// file yields an empty index.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            dir: dir.to_path_buf(),
            records,
        })
    }

    /// Find a previously built artifact, returning its path.
    ///
    /// Consults the index first, then falls back to the composed filename on
    /// disk so artifacts that predate the index are still found. Either way
    /// the file must actually exist.
    pub fn lookup(&self, project: &str, branch: &str, commit: &str) -> Option<PathBuf> {
        let recorded = self
            .records
            .iter()
            .find(|r| r.project == project && r.branch == branch && r.commit == commit)
            .map(|r| self.dir.join(&r.file));
        if let Some(path) = recorded {
            if path.exists() {
                return Some(path);
            }
            debug!(path = %path.display(), "indexed artifact is gone; ignoring record");
        }

        let fallback = self.dir.join(artifact_file_name(project, branch, commit));
        fallback.exists().then_some(fallback)
    }

    /// Record an artifact, replacing any previous record for the same
    /// (project, branch, commit) key, and persist the index.
    pub fn record(&mut self, project: &str, branch: &str, commit: &str, file: &str) -> Result<()> {
        self.records
            .retain(|r| !(r.project == project && r.branch == branch && r.commit == commit));
        self.records.push(ArtifactRecord {
            project: project.to_string(),
            branch: branch.to_string(),
            commit: commit.to_string(),
            file: file.to_string(),
            created_at: Utc::now(),
        });

        std::fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(self.dir.join(INDEX_FILE), raw)?;
        Ok(())
    }
}
