use std::path::Path;

use serde::Deserialize;

use crate::error::{BuildError, Result};

/// Project manifest file read from the project root.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
}

/// Read the project's declared name from its manifest.
///
/// Only the `name` field is consumed; the rest of the manifest belongs to the
/// build tool.
pub fn read_project_name(project_root: &Path) -> Result<String> {
    let path = project_root.join(MANIFEST_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BuildError::ManifestMissing(path));
        }
        Err(e) => return Err(e.into()),
    };

    let manifest: RawManifest =
        serde_json::from_str(&raw).map_err(|source| BuildError::ManifestInvalid {
            path: path.clone(),
            source,
        })?;

    match manifest.name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(BuildError::UnnamedProject(path)),
    }
}
