use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};

use delfx_api::UploadFields;
use delfx_api_client::ApiClient;
use delfx_core::{build_dir, read_project_name, ArtifactIndex};

use crate::build_cmd::resolve_project_root;
use crate::config::load_config;
use crate::session::SessionStore;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Upload the project's build artifact to the deployment endpoint.
///
/// Requires a prior `delfx login` (for credentials) and a prior `delfx build`
/// (for the artifact). The artifact is resolved by branch and commit, which
/// default to the repository's current HEAD.
pub async fn run_deploy(
    path: Option<&Path>,
    branch: Option<&str>,
    commit: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let session = SessionStore::in_system_tmp().load()?;

    let project_root = resolve_project_root(path)?;
    let project_name = read_project_name(&project_root)?;

    let (branch, commit) = resolve_artifact_ref(&project_root, branch, commit)?;

    let index = ArtifactIndex::load(&build_dir(&project_root))?;
    let Some(artifact) = index.lookup(&project_name, &branch, &commit) else {
        bail!("no build artifact for {project_name} at {branch}@{commit}; run `delfx build` first");
    };

    let mut client = ApiClient::new(&config.server.url, &config.server.client_key, UPLOAD_TIMEOUT)?;
    client.set_user_token(session.token);

    println!("Deploying {} to {}...", artifact.display(), client.base_url());
    client
        .upload_artifact(
            &artifact,
            &UploadFields {
                project_name: project_name.clone(),
                user_id: session.user_id,
            },
        )
        .await?;

    println!("Deployed {project_name} ({branch}@{commit}).");
    Ok(())
}

/// Resolve which (branch, commit) artifact to deploy.
///
/// Both default to the repository's HEAD; a branch-only request resolves
/// that branch's own tip, matching what `delfx build --branch` produced.
fn resolve_artifact_ref(
    project_root: &Path,
    branch: Option<&str>,
    commit: Option<&str>,
) -> Result<(String, String)> {
    if let (Some(b), Some(c)) = (branch, commit) {
        return Ok((b.to_string(), c.to_string()));
    }

    let repo = delfx_git::open_repo(project_root)?;
    let head = delfx_git::head_position(&repo)?;

    let branch = branch.unwrap_or(&head.branch).to_string();
    let commit = match commit {
        Some(c) => c.to_string(),
        None if branch != head.branch => delfx_git::branch_tip(&repo, &branch)?,
        None => head.commit.clone(),
    };
    Ok((branch, commit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use delfx_git::test_utils::{git, init_test_repo};

    // Network-facing success/failure paths are covered in delfx-api-client's
    // client tests; these cover the preflight checks.

    #[test]
    fn branch_only_deploy_resolves_that_branchs_tip() {
        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());
        git(tmp.path(), &["branch", "feature"]);
        std::fs::write(tmp.path().join("main-only.txt"), "main").unwrap();
        git(tmp.path(), &["add", "."]);
        git(tmp.path(), &["commit", "-m", "main only"]);

        let repo = delfx_git::open_repo(tmp.path()).unwrap();
        let head = delfx_git::head_position(&repo).unwrap();
        let feature_tip = delfx_git::branch_tip(&repo, "feature").unwrap();
        assert_ne!(head.commit, feature_tip);
        drop(repo);

        let (branch, commit) =
            resolve_artifact_ref(tmp.path(), Some("feature"), None).unwrap();
        assert_eq!(branch, "feature");
        assert_eq!(
            commit, feature_tip,
            "deploy must look up the artifact the branch build produced"
        );

        // A bare resolve still follows HEAD.
        let (branch, commit) = resolve_artifact_ref(tmp.path(), None, None).unwrap();
        assert_eq!(branch, "main");
        assert_eq!(commit, head.commit);
    }

    #[tokio::test]
    async fn deploy_without_build_names_the_missing_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());
        std::fs::write(tmp.path().join("package.json"), r#"{"name":"myapp"}"#).unwrap();

        // With no artifact built, deploy must stop at a preflight check
        // (missing credentials or missing artifact, whichever fires first)
        // and never attempt an upload.
        let err = run_deploy(Some(tmp.path()), Some("main"), Some("abc1234"))
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(
            msg.contains("delfx login") || msg.contains("delfx build"),
            "{msg}"
        );
    }
}
