use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_SERVER_URL: &str = "https://api.deltafunctions.io";

/// Client key identifying this CLI to the platform API. Overridable via the
/// config file for self-hosted deployments.
const DEFAULT_CLIENT_KEY: &str = "123456789";

pub const CONFIG_FILE_NAME: &str = "delfx.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default = "default_client_key")]
    pub client_key: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_client_key() -> String {
    DEFAULT_CLIENT_KEY.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            client_key: default_client_key(),
        }
    }
}

/// Get the config directory path (~/.config/delfx/)
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("delfx"))
}

/// Canonical config file path.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from disk, returning defaults if no file exists.
pub fn load_config() -> Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config at {}", path.display()))
}

/// Save config to disk (in `delfx.toml`).
pub fn save_config(config: &CliConfig) -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config dir at {}", dir.display()))?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    let path = config_path()?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(())
}

/// Print current config.
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    let path = config_path()?;
    println!("Config file: {}", path.display());
    println!();
    println!("[server]");
    println!("  url        = {}", config.server.url);
    println!("  client_key = {}", redacted(&config.server.client_key));
    Ok(())
}

/// First few characters of the key, never a partial code point.
fn redacted(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}...")
}

/// Update config with provided values.
pub fn set_config(server_url: Option<String>, client_key: Option<String>) -> Result<()> {
    let mut config = load_config()?;

    if let Some(url) = server_url {
        config.server.url = url;
    }
    if let Some(key) = client_key {
        config.server.client_key = key;
    }

    save_config(&config)?;
    println!("Configuration updated.");
    show_config()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let config = CliConfig::default();
        assert_eq!(config.server.url, DEFAULT_SERVER_URL);
        assert!(!config.server.client_key.is_empty());
    }

    #[test]
    fn redaction_respects_char_boundaries() {
        assert_eq!(redacted("123456789"), "1234...");
        assert_eq!(redacted("ab"), "ab...");
        // Multibyte keys must not panic on a byte-slice boundary.
        assert_eq!(redacted("ключ-секретный"), "ключ...");
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: CliConfig = toml::from_str("[server]\nurl = \"http://localhost:3000\"\n").unwrap();
        assert_eq!(config.server.url, "http://localhost:3000");
        assert_eq!(config.server.client_key, DEFAULT_CLIENT_KEY);
    }
}
