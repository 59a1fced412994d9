/// Run a `git` subcommand in `dir`, panicking on failure. Test-only helper.
pub fn git(dir: &std::path::Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git failed to start");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a minimal git repository for testing.
///
/// Creates a repo with an initial commit on `main` so that HEAD exists.
pub fn init_test_repo(dir: &std::path::Path) {
    git(dir, &["init", "--initial-branch=main"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);

    std::fs::write(dir.join("README"), "test repo").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "init"]);
}
