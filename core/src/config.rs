//! Connection settings for the compute service.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_URL: &str = "https://compute.rhino3d.com/";

pub const ENV_URL: &str = "RHINO_COMPUTE_URL";
pub const ENV_API_KEY: &str = "RHINO_COMPUTE_KEY";
pub const ENV_AUTH_TOKEN: &str = "RHINO_COMPUTE_AUTH_TOKEN";
pub const ENV_STOP_AT: &str = "RHINO_COMPUTE_STOPAT";
pub const ENV_TIMEOUT_SECS: &str = "RHINO_COMPUTE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub stop_at: Option<u32>,
    /// Whole-request timeout applied by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            auth_token: None,
            stop_at: None,
            timeout: None,
        }
    }
}

impl ComputeConfig {
    /// Read settings from the process environment. Unset or empty variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ComputeConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = var(ENV_URL) {
            config.url = url;
        }
        config.api_key = var(ENV_API_KEY);
        config.auth_token = var(ENV_AUTH_TOKEN);
        if let Some(raw) = var(ENV_STOP_AT) {
            config.stop_at = Some(parse_number(ENV_STOP_AT, &raw)?);
        }
        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            config.timeout = Some(Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &raw)?));
        }
        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, raw: &str) -> Result<N, ApiError>
where
    N::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ApiError::Config(format!("{key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ComputeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ComputeConfig::default());
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn every_variable_is_read() {
        let config = ComputeConfig::from_lookup(lookup(&[
            (ENV_URL, "http://localhost:8081"),
            (ENV_API_KEY, "key"),
            (ENV_AUTH_TOKEN, "token"),
            (ENV_STOP_AT, "2"),
            (ENV_TIMEOUT_SECS, " 30 "),
        ]))
        .unwrap();
        assert_eq!(config.url, "http://localhost:8081");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.auth_token.as_deref(), Some("token"));
        assert_eq!(config.stop_at, Some(2));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = ComputeConfig::from_lookup(lookup(&[(ENV_API_KEY, "  "), (ENV_URL, "")])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = ComputeConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(msg) if msg.contains(ENV_TIMEOUT_SECS)));
    }
}
