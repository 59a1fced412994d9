use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use delfx_api::LoginRequest;
use delfx_api_client::ApiClient;

use crate::config::load_config;
use crate::session::{Session, SessionStore};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Interactive login: prompt for credentials, authenticate, persist session.
pub async fn run_login() -> Result<()> {
    let config = load_config()?;

    let email: String = Input::new()
        .with_prompt("Enter your email")
        .interact_text()
        .context("failed to read email")?;
    let password: String = Password::new()
        .with_prompt("Enter your password")
        .interact()
        .context("failed to read password")?;

    let client = ApiClient::new(&config.server.url, &config.server.client_key, LOGIN_TIMEOUT)?;
    let store = SessionStore::in_system_tmp();
    let session = login_and_store(&client, &email, &password, &store).await?;

    println!("Login successful.");
    println!("Logged in as user {}", session.user_id);
    Ok(())
}

/// Authenticate and persist the session on success.
///
/// A rejected login propagates the API error and writes nothing.
pub async fn login_and_store(
    client: &ApiClient,
    email: &str,
    password: &str,
    store: &SessionStore,
) -> Result<Session> {
    let resp = client
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .context("login failed")?;

    let session = Session {
        user_id: resp.user_id,
        token: resp.token,
    };
    store.store(&session)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one HTTP request with a canned response.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then the Content-Length'd body, before replying.
            let header_end = loop {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed early");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos;
                }
            };
            let headers = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let content_length: usize = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse().ok())?
                })
                .unwrap_or(0);
            while raw.len() < header_end + 4 + content_length {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed early");
                raw.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, "key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn successful_login_persists_credentials() {
        let base_url = serve_once("HTTP/1.1 200 OK", r#"{"user_id":"u1","token":"t1"}"#).await;
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(tmp.path());

        let session = login_and_store(&client_for(&base_url), "dev@example.com", "pw", &store)
            .await
            .unwrap();

        assert_eq!(session.user_id, "u1");
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "u1:t1");
    }

    #[tokio::test]
    async fn rejected_login_writes_nothing() {
        let base_url = serve_once("HTTP/1.1 401 Unauthorized", "{}").await;
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(tmp.path());

        let err = login_and_store(&client_for(&base_url), "dev@example.com", "wrong", &store)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("401"), "{err:#}");
        assert!(!store.path().exists(), "no session file may be written");
    }
}
