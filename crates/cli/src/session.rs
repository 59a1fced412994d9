use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Directory under the system temp dir holding the credentials file.
pub const SESSION_DIR: &str = ".delfx";

/// Credentials file name. Format: `user_id:token`, one line, no trailing
/// newline. Tokens may contain colons; user IDs may not.
pub const CREDS_FILE: &str = "user_creds.creds";

/// A logged-in user's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

/// Reads and writes the persisted session file.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// The canonical store under the system temp directory
    /// (`<tmp>/.delfx/user_creds.creds`).
    pub fn in_system_tmp() -> Self {
        Self {
            dir: std::env::temp_dir().join(SESSION_DIR),
        }
    }

    /// A store rooted at an arbitrary directory.
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CREDS_FILE)
    }

    /// Persist a session, replacing any previous one.
    ///
    /// Writes to a temp file in the same directory and renames it into
    /// place, so a crash mid-write cannot leave a corrupt file.
    pub fn store(&self, session: &Session) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .context("failed to create temp credentials file")?;
        std::fs::write(tmp.path(), format!("{}:{}", session.user_id, session.token))
            .context("failed to write credentials")?;
        let path = self.path();
        tmp.persist(&path)
            .with_context(|| format!("failed to persist {}", path.display()))?;

        debug!(path = %path.display(), "session stored");
        Ok(())
    }

    /// Load the persisted session.
    ///
    /// Splits on the first colon only. A missing file means the user never
    /// logged in; both that and a malformed file are reported with a hint to
    /// run `delfx login`.
    pub fn load(&self) -> Result<Session> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("not logged in (no credentials at {}); run `delfx login`", path.display());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read credentials at {}", path.display()));
            }
        };

        let Some((user_id, token)) = raw.split_once(':') else {
            bail!(
                "malformed credentials at {}; run `delfx login` again",
                path.display()
            );
        };
        if user_id.is_empty() || token.is_empty() {
            bail!(
                "malformed credentials at {}; run `delfx login` again",
                path.display()
            );
        }

        Ok(Session {
            user_id: user_id.to_string(),
            token: token.to_string(),
        })
    }
}
