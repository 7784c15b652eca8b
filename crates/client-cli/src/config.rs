use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend URL used when neither the CLI flag, the environment, nor the
/// config file provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "LIPI_API_URL";

/// How long a stored token stays usable before the client discards it.
/// Matches the session lifetime the backend grants on login.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub server: Option<String>,
    pub token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "lipi", "lipi")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the backend base URL: CLI flag, then environment, then
    /// config file, then the local default.
    pub fn api_url(&self, flag: Option<String>) -> String {
        resolve_api_url(
            flag,
            std::env::var(API_URL_ENV).ok(),
            self.remote.server.as_deref(),
        )
    }

    /// Record a fresh token with the standard expiry.
    pub fn store_token(&mut self, token: &str) {
        self.remote.token = Some(token.to_string());
        self.remote.token_expires_at = Some(Utc::now() + Duration::days(TOKEN_TTL_DAYS));
    }

    pub fn clear_token(&mut self) {
        self.remote.token = None;
        self.remote.token_expires_at = None;
    }

    /// The stored token, unless it has expired. An expired token is
    /// dropped from this instance; callers persist the removal via `save`.
    pub fn valid_token(&mut self) -> Option<String> {
        self.valid_token_at(Utc::now())
    }

    fn valid_token_at(&mut self, now: DateTime<Utc>) -> Option<String> {
        match (&self.remote.token, self.remote.token_expires_at) {
            (Some(token), Some(expires)) if expires > now => Some(token.clone()),
            // Tokens set by hand (`lipi config set token ...`) carry no expiry.
            (Some(token), None) => Some(token.clone()),
            (Some(_), Some(_)) => {
                self.clear_token();
                None
            }
            (None, _) => None,
        }
    }
}

fn resolve_api_url(flag: Option<String>, env: Option<String>, file: Option<&str>) -> String {
    flag.or(env)
        .or_else(|| file.map(String::from))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Persist a freshly issued token. Used by the session after login/signup.
pub fn persist_token(token: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.store_token(token);
    config.save()
}

/// Remove any persisted token. Used by logout and the 401 handler.
pub fn forget_persisted_token() -> Result<()> {
    let mut config = Config::load()?;
    config.clear_token();
    config.save()
}
