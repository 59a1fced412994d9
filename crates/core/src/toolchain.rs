use std::path::Path;

use crate::error::{BuildError, Result};
use crate::manifest::MANIFEST_FILE;

/// Install/build commands and output directory for a project type.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub name: &'static str,
    pub install: Vec<String>,
    pub build: Vec<String>,
    pub output_dir: String,
}

impl Toolchain {
    /// The npm toolchain: `npm install`, `npm run build`, output in `build/`.
    pub fn npm() -> Self {
        Self {
            name: "npm",
            install: vec!["npm".into(), "install".into()],
            build: vec!["npm".into(), "run".into(), "build".into()],
            output_dir: "build".into(),
        }
    }

    /// Detect the project's toolchain from files in its root.
    ///
    /// npm is the only supported project type; a missing `package.json` is
    /// reported as such.
    pub fn detect(project_root: &Path) -> Result<Self> {
        let manifest = project_root.join(MANIFEST_FILE);
        if manifest.exists() {
            Ok(Self::npm())
        } else {
            Err(BuildError::ManifestMissing(manifest))
        }
    }
}
