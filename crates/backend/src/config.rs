//! Backend endpoint configuration.

use thiserror::Error;

/// Environment variable naming the backend base URL.
pub const URL_VAR: &str = "SUPPLYLINE_BACKEND_URL";

/// Environment variable naming the backend API key.
pub const KEY_VAR: &str = "SUPPLYLINE_BACKEND_KEY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// The two values the client cannot run without.
///
/// There are no defaults: a missing value is a startup error, and the
/// process exits before any remote call is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            url,
            key: key.into(),
        }
    }

    /// Read the configuration from the environment, failing fast on either
    /// missing value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(URL_VAR).map_err(|_| ConfigError::MissingVar(URL_VAR))?;
        let key = std::env::var(KEY_VAR).map_err(|_| ConfigError::MissingVar(KEY_VAR))?;
        Ok(Self::new(url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the variables are process-global, so set/unset pairs must
    // not interleave across test threads.
    #[test]
    fn from_env_requires_both_values() {
        unsafe {
            std::env::remove_var(URL_VAR);
            std::env::remove_var(KEY_VAR);
        }
        assert_eq!(
            BackendConfig::from_env(),
            Err(ConfigError::MissingVar(URL_VAR))
        );

        unsafe { std::env::set_var(URL_VAR, "https://example.test/") };
        assert_eq!(
            BackendConfig::from_env(),
            Err(ConfigError::MissingVar(KEY_VAR))
        );

        unsafe { std::env::set_var(KEY_VAR, "anon-key") };
        let config = BackendConfig::from_env().unwrap();
        // Trailing slash is normalized away so URL joins stay predictable.
        assert_eq!(config.url, "https://example.test");
        assert_eq!(config.key, "anon-key");

        unsafe {
            std::env::remove_var(URL_VAR);
            std::env::remove_var(KEY_VAR);
        }
    }
}
