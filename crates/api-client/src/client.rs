use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use reqwest::StatusCode;
use tracing::debug;

use delfx_api::{LoginRequest, LoginResponse, UploadFields, LOGIN_PATH, UPLOAD_PATH, USER_TOKEN_HEADER};

use crate::error::{ApiError, Result};

/// Typed HTTP client for the Delta Functions API.
///
/// Every request carries the client key as a bearer `Authorization` header.
/// Authenticated requests additionally carry the logged-in user's session
/// token in the `User-Token` header.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    client_key: String,
    user_token: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given base URL, client key, and request
    /// timeout. Requests never hang indefinitely.
    pub fn new(base_url: &str, client_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_key: client_key.to_string(),
            user_token: None,
        })
    }

    pub fn set_user_token(&mut self, token: String) {
        self.user_token = Some(token);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token_or_err(&self) -> Result<&str> {
        self.user_token.as_deref().ok_or(ApiError::MissingToken)
    }

    /// Log in with email and password.
    ///
    /// Posts the credentials form-encoded and expects a 200 response with a
    /// JSON body carrying `user_id` and `token`.
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        let resp = self
            .client
            .post(self.url(LOGIN_PATH))
            .bearer_auth(&self.client_key)
            .form(req)
            .send()
            .await?;

        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(resp.json().await?)
    }

    /// Upload a build artifact for deployment.
    ///
    /// Sends a multipart form with `project_name` and `user_id` fields plus
    /// the archive as the `file` part. The server answers 201 on success;
    /// the response body is not consumed.
    pub async fn upload_artifact(&self, artifact: &Path, fields: &UploadFields) -> Result<()> {
        let token = self.token_or_err()?;

        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact.tar".to_string());
        let bytes = tokio::fs::read(artifact).await?;
        debug!(
            artifact = %artifact.display(),
            bytes = bytes.len(),
            "uploading build artifact"
        );

        let form = multipart::Form::new()
            .text("project_name", fields.project_name.clone())
            .text("user_id", fields.user_id.clone())
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let resp = self
            .client
            .post(self.url(UPLOAD_PATH))
            .bearer_auth(&self.client_key)
            .header(USER_TOKEN_HEADER, token)
            .multipart(form)
            .send()
            .await?;

        expect_status(resp, StatusCode::CREATED).await?;
        Ok(())
    }
}

/// Check an HTTP response against the expected status, turning anything else
/// into [`ApiError::Status`] with the body text attached.
async fn expect_status(resp: reqwest::Response, expected: StatusCode) -> Result<reqwest::Response> {
    let status = resp.status();
    if status != expected {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
