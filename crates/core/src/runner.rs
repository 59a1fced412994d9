use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{BuildError, Result};

/// Captured output of a successful tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run an external tool in `cwd`, capturing its output.
///
/// A non-zero exit status is a typed [`BuildError::ToolFailed`]; it is never
/// swallowed. The CLI process's own working directory is left untouched.
pub fn run_tool(command: &[String], cwd: &Path) -> Result<ToolOutput> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| std::io::Error::other("empty tool command"))?;

    debug!(command = %command.join(" "), cwd = %cwd.display(), "running tool");
    let output = Command::new(program).args(args).current_dir(cwd).output()?;

    if !output.status.success() {
        return Err(BuildError::ToolFailed {
            command: command.join(" "),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn captures_stdout_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let out = run_tool(&sh("echo hello"), tmp.path()).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn runs_in_the_given_directory() {
        let tmp = tempfile::tempdir().unwrap();
        run_tool(&sh("touch marker"), tmp.path()).unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn nonzero_exit_is_typed_with_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_tool(&sh("echo boom >&2; exit 3"), tmp.path()).unwrap_err();
        match err {
            BuildError::ToolFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("expected ToolFailed, got: {other}"),
        }
    }

    #[test]
    fn empty_command_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(run_tool(&[], tmp.path()).is_err());
    }
}
