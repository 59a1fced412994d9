use std::path::Path;

use anyhow::{Context, Result};

/// Create the project directory (if needed) and an empty git repository.
///
/// Idempotent: running it against an existing project reports and succeeds.
pub fn run_init(path: Option<&Path>) -> Result<()> {
    let cwd;
    let project_root = match path {
        Some(p) => p,
        None => {
            cwd = std::env::current_dir().context("read current directory")?;
            &cwd
        }
    };

    let created = delfx_git::init_repo(project_root)
        .with_context(|| format!("failed to initialize {}", project_root.display()))?;

    if created {
        println!("Initialized empty project in {}", project_root.display());
    } else {
        println!(
            "Project in {} is already initialized",
            project_root.display()
        );
    }
    Ok(())
}
