use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use delfx_core::{build_dir, read_project_name, ArtifactIndex, Toolchain};
use delfx_git::GitError;

/// Build the project and package the output, returning the artifact path.
///
/// A build for an explicitly requested (branch, commit) pair that already
/// exists in the artifact cache is returned as-is without running any tool.
pub fn run_build(
    path: Option<&Path>,
    branch: Option<&str>,
    commit: Option<&str>,
    allow_dirty: bool,
) -> Result<PathBuf> {
    let project_root = resolve_project_root(path)?;
    let project_name = read_project_name(&project_root)?;

    if let (Some(branch), Some(commit)) = (branch, commit) {
        let index = ArtifactIndex::load(&build_dir(&project_root))?;
        if let Some(cached) = index.lookup(&project_name, branch, commit) {
            println!("Using cached build: {}", cached.display());
            return Ok(cached);
        }
    }

    let (target_branch, target_commit) =
        resolve_build_target(&project_root, branch, commit, allow_dirty)?;

    let toolchain = Toolchain::detect(&project_root)?;
    println!(
        "Building {project_name} at {target_branch}@{target_commit} with {}...",
        toolchain.name
    );
    let artifact = delfx_core::produce_build(
        &project_root,
        &project_name,
        &target_branch,
        &target_commit,
        &toolchain,
    )?;

    println!("Build archived: {}", artifact.display());
    Ok(artifact)
}

/// Resolve the (branch, commit) a build is labeled with, checking out the
/// requested target when it is not what HEAD already points at.
///
/// A branch-only request resolves that branch's own tip commit, so the
/// artifact name and index record always describe the tree that was built,
/// never the commit that happened to be checked out beforehand.
fn resolve_build_target(
    project_root: &Path,
    branch: Option<&str>,
    commit: Option<&str>,
    allow_dirty: bool,
) -> Result<(String, String)> {
    let repo = delfx_git::open_repo(project_root)?;
    let head = delfx_git::head_position(&repo)?;

    let target_branch = branch.unwrap_or(&head.branch).to_string();
    let target_commit = match commit {
        Some(c) => c.to_string(),
        None if target_branch != head.branch => delfx_git::branch_tip(&repo, &target_branch)?,
        None => head.commit.clone(),
    };

    // Checking out is opt-in: only an explicitly requested branch or commit
    // moves the working tree, and only when the tree is clean.
    let needs_checkout =
        branch.is_some_and(|b| b != head.branch) || commit.is_some_and(|c| c != head.commit);
    if needs_checkout {
        if !allow_dirty && !delfx_git::is_worktree_clean(project_root)? {
            return Err(GitError::DirtyWorkTree.into());
        }
        if let Some(branch) = branch {
            delfx_git::checkout(project_root, branch)?;
        }
        if let Some(commit) = commit {
            delfx_git::checkout(project_root, commit)?;
        }
    }

    Ok((target_branch, target_commit))
}

/// The project directory a command operates on: the given path, or for a bare
/// invocation the enclosing repository of the current directory (falling back
/// to the current directory itself).
pub fn resolve_project_root(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("read current directory")?;
            delfx_git::find_repo_root(&cwd).unwrap_or(cwd)
        }
    };
    if !root.is_dir() {
        bail!("project directory not found: {}", root.display());
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use delfx_core::artifact_file_name;
    use delfx_git::test_utils::{git, init_test_repo};
    use std::sync::{Mutex, OnceLock};

    fn write_manifest(root: &Path, name: &str) {
        std::fs::write(
            root.join("package.json"),
            format!(r#"{{"name":"{name}"}}"#),
        )
        .unwrap();
    }

    /// Repo with the manifest committed on `main`, a `feature` branch, and
    /// one extra commit on `main` so the two branch tips differ.
    fn init_two_branch_repo(root: &Path) {
        init_test_repo(root);
        write_manifest(root, "myapp");
        git(root, &["add", "."]);
        git(root, &["commit", "-m", "manifest"]);
        git(root, &["branch", "feature"]);
        std::fs::write(root.join("main-only.txt"), "main").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-m", "main only"]);
    }

    fn cwd_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct CwdRestore {
        path: PathBuf,
    }

    impl CwdRestore {
        fn capture() -> Self {
            Self {
                path: std::env::current_dir().expect("capture current directory"),
            }
        }
    }

    impl Drop for CwdRestore {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.path);
        }
    }

    #[test]
    fn cached_artifact_short_circuits_the_build() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "myapp");

        // Seed the cache; no git repo and no toolchain run are needed for a hit.
        let dir = build_dir(tmp.path());
        std::fs::create_dir_all(&dir).unwrap();
        let file = artifact_file_name("myapp", "main", "abc1234");
        std::fs::write(dir.join(&file), b"tar").unwrap();

        let path = run_build(Some(tmp.path()), Some("main"), Some("abc1234"), false).unwrap();
        assert_eq!(path, dir.join(file));
    }

    #[test]
    fn missing_artifact_triggers_a_real_build() {
        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());
        write_manifest(tmp.path(), "myapp");

        // No cache entry for this pair, no npm in the fixture: the command
        // must get past the cache and fail in the toolchain run.
        let err = run_build(Some(tmp.path()), None, None, false).unwrap_err();
        let msg = format!("{err:#}");
        assert!(
            !msg.contains("cached"),
            "should not have hit the cache: {msg}"
        );
    }

    #[test]
    fn branch_only_build_is_labeled_with_that_branchs_tip() {
        let tmp = tempfile::tempdir().unwrap();
        init_two_branch_repo(tmp.path());

        let repo = delfx_git::open_repo(tmp.path()).unwrap();
        let main_tip = delfx_git::head_position(&repo).unwrap().commit;
        let feature_tip = delfx_git::branch_tip(&repo, "feature").unwrap();
        assert_ne!(main_tip, feature_tip);
        drop(repo);

        let (branch, commit) =
            resolve_build_target(tmp.path(), Some("feature"), None, false).unwrap();
        assert_eq!(branch, "feature");
        assert_eq!(
            commit, feature_tip,
            "artifact must carry the built tree's commit, not the pre-checkout head"
        );

        // The working tree was switched to what the label says.
        let repo = delfx_git::open_repo(tmp.path()).unwrap();
        let head = delfx_git::head_position(&repo).unwrap();
        assert_eq!(head.branch, "feature");
        assert_eq!(head.commit, feature_tip);
    }

    #[test]
    fn explicit_commit_is_used_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        init_two_branch_repo(tmp.path());

        let repo = delfx_git::open_repo(tmp.path()).unwrap();
        let feature_tip = delfx_git::branch_tip(&repo, "feature").unwrap();
        drop(repo);

        let (branch, commit) =
            resolve_build_target(tmp.path(), Some("feature"), Some(&feature_tip), false).unwrap();
        assert_eq!((branch.as_str(), commit), ("feature", feature_tip));
    }

    #[test]
    fn dirty_tree_blocks_requested_checkout() {
        let tmp = tempfile::tempdir().unwrap();
        init_two_branch_repo(tmp.path());
        std::fs::write(tmp.path().join("wip.txt"), "uncommitted").unwrap();

        let err = run_build(Some(tmp.path()), Some("feature"), None, false).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("uncommitted"), "{msg}");
    }

    #[test]
    fn bare_invocation_targets_the_enclosing_repo() {
        let _lock = cwd_test_lock().lock().expect("lock cwd test");
        let _restore = CwdRestore::capture();

        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());
        let nested = tmp.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let root = resolve_project_root(None).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn missing_project_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(run_build(Some(&missing), None, None, false).is_err());
    }
}
