//! Shared API types for the Delta Functions platform.
//!
//! This crate is the single source of truth for the request/response shapes
//! and protocol constants used by the CLI when talking to the platform API.

use serde::{Deserialize, Serialize};

/// Header carrying the logged-in user's session token on authenticated
/// requests. The `Authorization` header is reserved for the client key.
pub const USER_TOKEN_HEADER: &str = "User-Token";

/// Path of the credential login endpoint, relative to the server base URL.
pub const LOGIN_PATH: &str = "/login";

/// Path of the artifact upload endpoint, relative to the server base URL.
pub const UPLOAD_PATH: &str = "/upload_project";

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Email + password login. Sent form-encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned on successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub token: String,
}

// ─── Upload ──────────────────────────────────────────────────────────────────

/// Multipart form fields accompanying an artifact upload. The archive itself
/// travels as the `file` part; the server answers 201 with no body the CLI
/// consumes.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadFields {
    pub project_name: String,
    pub user_id: String,
}
