//! Git operations for the Delta Functions CLI.
//!
//! Repository queries (open, HEAD branch/commit, init) go through `gix`;
//! working-tree operations (status, checkout) shell out to the `git` binary
//! with exit codes checked.

pub mod error;
pub mod ops;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{GitError, Result};
pub use ops::{
    branch_tip, checkout, find_repo_root, head_position, init_repo, is_worktree_clean, open_repo,
    HeadPosition,
};
