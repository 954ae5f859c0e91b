//! API client configuration

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Default API base used by the anti-spam backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Connection and persistence settings for the anti-spam API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against. Always ends
    /// with `/` so joining keeps the `/api/v1` prefix.
    pub base_url: Url,
    /// File the credential token is persisted to.
    pub token_path: PathBuf,
}

impl ApiConfig {
    /// Build a configuration for `base_url` with the default token
    /// location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not an absolute
    /// http(s) URL with a host.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token_path: default_token_path(),
        })
    }

    /// Override the token file location.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Reads from `.env` file if present. All variables are optional:
    /// - `ANTISPAM_API_URL` (default: `http://localhost:8000/api/v1`)
    /// - `ANTISPAM_TOKEN_FILE` (default: `antispam/token.json` under the
    ///   platform config directory)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("ANTISPAM_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let config = Self::new(&base_url)?;

        Ok(match env::var_os("ANTISPAM_TOKEN_FILE") {
            Some(path) => config.with_token_path(path),
            None => config,
        })
    }

    /// Full URL for an endpoint path such as `/emails/sent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid endpoint '{path}': {e}")))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |why: &str| Error::Config(format!("Invalid ANTISPAM_API_URL '{raw}': {why}"));

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn default_token_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(".antispam-token.json"),
        |dir| dir.join("antispam").join("token.json"),
    )
}
