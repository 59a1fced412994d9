use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::{BuildError, Result};

/// Name the build output directory is stored under inside the archive,
/// regardless of what it is called on disk.
pub const ARCHIVE_ROOT: &str = "build";

/// Package a build output directory into a tar archive at `dest`.
///
/// Entries are rooted at `build/` so the server can unpack every project the
/// same way. Symlinks are stored as links, not followed.
pub fn archive_build_dir(output_dir: &Path, dest: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        return Err(BuildError::MissingOutput(output_dir.to_path_buf()));
    }

    let file = File::create(dest)?;
    let mut builder = tar::Builder::new(file);
    builder.follow_symlinks(false);
    builder.append_dir_all(ARCHIVE_ROOT, output_dir)?;
    builder.into_inner()?.sync_all()?;

    info!(archive = %dest.display(), "packaged build output");
    Ok(())
}
