use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no project manifest at {0}")]
    ManifestMissing(PathBuf),

    #[error("invalid manifest {path}: {source}")]
    ManifestInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("manifest {0} has no \"name\" field")]
    UnnamedProject(PathBuf),

    #[error("`{command}` failed with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("build output directory not found: {0}")]
    MissingOutput(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
