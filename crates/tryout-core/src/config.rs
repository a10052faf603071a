//! Application configuration.
//!
//! Configuration comes from the process environment, read once at startup.
//! The binary loads a `.env` file first, so either works:
//!
//! - `TRYOUT_API_BASE_URL` (required): base URL of the registration backend
//! - `TRYOUT_REQUEST_TIMEOUT_SECS` (optional): per-request timeout; unset means
//!   requests wait for as long as the server takes

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

/// Environment variable holding the backend base URL
pub const BASE_URL_VAR: &str = "TRYOUT_API_BASE_URL";

/// Environment variable holding the optional request timeout
pub const TIMEOUT_VAR: &str = "TRYOUT_REQUEST_TIMEOUT_SECS";

/// Path of the registration endpoint, relative to the base URL
const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL without trailing slash
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .with_context(|| format!("{} is not set", BASE_URL_VAR))?;

        let api_base_url = raw_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&api_base_url)
            .with_context(|| format!("{} is not a valid URL: {}", BASE_URL_VAR, raw_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("{} must use http or https, got {}", BASE_URL_VAR, parsed.scheme());
        }

        let request_timeout = match lookup(TIMEOUT_VAR).map(|v| v.trim().to_string()) {
            None => None,
            Some(v) if v.is_empty() => None,
            Some(v) => {
                let secs: u64 = v
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_VAR))?;
                if secs == 0 {
                    bail!("{} must be greater than zero", TIMEOUT_VAR);
                }
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            api_base_url,
            request_timeout,
        })
    }

    /// Full URL of the registration endpoint.
    pub fn register_url(&self) -> String {
        format!("{}{}", self.api_base_url, REGISTER_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_base_url_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(BASE_URL_VAR));

        assert!(Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "   ")])).is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config =
            Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "https://api.example.org/")])).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.org");
        assert_eq!(config.register_url(), "https://api.example.org/auth/register");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config =
            Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "http://localhost:3500/api")])).unwrap();
        assert_eq!(config.register_url(), "http://localhost:3500/api/auth/register");
    }

    #[test]
    fn test_rejects_invalid_urls() {
        assert!(Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "not a url")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "ftp://example.org")])).is_err());
    }

    #[test]
    fn test_request_timeout() {
        let config = Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://api.example.org"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));

        assert!(Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://api.example.org"),
            (TIMEOUT_VAR, "0"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://api.example.org"),
            (TIMEOUT_VAR, "soon"),
        ]))
        .is_err());
    }
}
