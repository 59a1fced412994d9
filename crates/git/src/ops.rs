use std::path::{Path, PathBuf};
use std::process::Command;

use gix::Repository;
use tracing::{debug, info};

use crate::error::{GitError, Result};

/// Wrap any gix-compatible error into [`GitError::Git`].
pub fn git_err(e: impl std::error::Error + Send + Sync + 'static) -> GitError {
    GitError::Git(Box::new(e))
}

/// Branch name and short commit hash of a repository's HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadPosition {
    pub branch: String,
    pub commit: String,
}

/// Initialize an empty git repository at `path`, creating the directory if
/// needed. Returns `false` when the path already holds a repository; calling
/// this twice is not an error.
pub fn init_repo(path: &Path) -> Result<bool> {
    std::fs::create_dir_all(path)?;
    if path.join(".git").exists() {
        debug!(path = %path.display(), "repository already initialized");
        return Ok(false);
    }
    gix::init(path).map_err(git_err)?;
    info!(path = %path.display(), "initialized empty repository");
    Ok(true)
}

/// Open a git repository at `repo_path`.
///
/// Returns [`GitError::NotARepo`] when `.git` is absent.
pub fn open_repo(repo_path: &Path) -> Result<Repository> {
    let repo = gix::open(repo_path).map_err(|e| {
        if repo_path.join(".git").exists() {
            git_err(e)
        } else {
            GitError::NotARepo(repo_path.to_path_buf())
        }
    })?;
    Ok(repo)
}

/// Resolve the currently checked-out branch and the 7-character short hash of
/// its head commit.
///
/// Returns [`GitError::DetachedHead`] when HEAD does not point at a branch.
pub fn head_position(repo: &Repository) -> Result<HeadPosition> {
    let name = repo
        .head_name()
        .map_err(git_err)?
        .ok_or(GitError::DetachedHead)?;
    let branch = name.shorten().to_string();

    let commit_id = repo.head_id().map_err(git_err)?.detach();
    let commit = commit_id.to_hex_with_len(7).to_string();

    Ok(HeadPosition { branch, commit })
}

/// Resolve the tip commit of a local branch as a 7-character short hash.
///
/// Used to label builds of a branch that is not currently checked out.
pub fn branch_tip(repo: &Repository, branch: &str) -> Result<String> {
    let ref_name = format!("refs/heads/{branch}");
    match repo.try_find_reference(ref_name.as_str()).map_err(git_err)? {
        Some(reference) => {
            let id = reference.into_fully_peeled_id().map_err(git_err)?;
            Ok(id.detach().to_hex_with_len(7).to_string())
        }
        None => Err(GitError::UnknownBranch(branch.to_string())),
    }
}

/// Whether the working tree has no staged, unstaged, or untracked changes.
pub fn is_worktree_clean(repo_path: &Path) -> Result<bool> {
    let output = run_git(repo_path, &["status", "--porcelain"])?;
    Ok(output.trim().is_empty())
}

/// Check out a branch or commit in the repository's working tree.
///
/// Callers are expected to verify the tree is clean first (or have the user
/// opt out); the checkout itself overwrites tracked files.
pub fn checkout(repo_path: &Path, rev: &str) -> Result<()> {
    run_git(repo_path, &["checkout", "--quiet", rev])?;
    info!(rev, repo = %repo_path.display(), "checked out");
    Ok(())
}

/// Find the git repository root by walking up from `from` looking for `.git`.
pub fn find_repo_root(from: &Path) -> Option<PathBuf> {
    let mut dir = from.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Run a `git` subcommand in `repo_path`, returning stdout on success and a
/// typed [`GitError::Command`] carrying the exit status and stderr otherwise.
fn run_git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    if !output.status.success() {
        return Err(GitError::Command {
            command: format!("git {}", args.join(" ")),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
