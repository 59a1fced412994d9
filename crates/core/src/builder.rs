use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive::archive_build_dir;
use crate::artifact::{artifact_file_name, build_dir, ArtifactIndex};
use crate::error::{BuildError, Result};
use crate::runner::run_tool;
use crate::toolchain::Toolchain;

/// Run a full build: install, build, archive, record.
///
/// Executes the toolchain's install and build commands with `project_root` as
/// their working directory, packages the output directory into the canonical
/// `{project}_{branch}_{commit}.tar` under `.delfx/build/`, and records the
/// artifact in the index. Any tool failure aborts before archiving.
pub fn produce_build(
    project_root: &Path,
    project_name: &str,
    branch: &str,
    commit: &str,
    toolchain: &Toolchain,
) -> Result<PathBuf> {
    info!(project = project_name, branch, commit, toolchain = toolchain.name, "building");

    run_tool(&toolchain.install, project_root)?;
    run_tool(&toolchain.build, project_root)?;

    let output_dir = project_root.join(&toolchain.output_dir);
    if !output_dir.is_dir() {
        return Err(BuildError::MissingOutput(output_dir));
    }

    let dir = build_dir(project_root);
    std::fs::create_dir_all(&dir)?;

    let file = artifact_file_name(project_name, branch, commit);
    let dest = dir.join(&file);
    archive_build_dir(&output_dir, &dest)?;

    let mut index = ArtifactIndex::load(&dir)?;
    index.record(project_name, branch, commit, &file)?;

    Ok(dest)
}
