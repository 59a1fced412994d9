use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    #[error("HEAD is detached; check out a branch or pass --branch and --commit")]
    DetachedHead,

    #[error("no such branch: {0}")]
    UnknownBranch(String),

    #[error("working tree has uncommitted changes; commit, stash, or pass --allow-dirty")]
    DirtyWorkTree,

    #[error("git {command} failed with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("git error: {0}")]
    Git(Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;
