//! Run settings — credentials, endpoint, model and sampling parameters.
//!
//! Settings are read once from the environment (optionally seeded from a
//! `.env` file), validated, and passed by value into the workflow executor.

use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const TEMPERATURE_VAR: &str = "AGENT_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "AGENT_MAX_TOKENS";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Values shipped in `.env.example`-style templates; never a real key.
const PLACEHOLDER_KEYS: &[&str] = &["your-api-key-here", "your_openai_api_key_here", "sk-..."];

#[derive(Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Settings {
    /// Build and validate settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        if PLACEHOLDER_KEYS.contains(&api_key.as_str()) {
            return Err(ConfigError::InvalidVar {
                name: API_KEY_VAR,
                value: api_key,
                reason: "placeholder value, set a real API key".to_string(),
            });
        }

        let base_url = get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidVar {
                name: API_BASE_VAR,
                value: base_url,
                reason: "must start with http:// or https://".to_string(),
            });
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let model = get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match get(TEMPERATURE_VAR) {
            None => DEFAULT_TEMPERATURE,
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                    name: TEMPERATURE_VAR,
                    value: raw.clone(),
                    reason: "not a number".to_string(),
                })?;
                if !value.is_finite() || !(0.0..=2.0).contains(&value) {
                    return Err(ConfigError::InvalidVar {
                        name: TEMPERATURE_VAR,
                        value: raw,
                        reason: "must be between 0.0 and 2.0".to_string(),
                    });
                }
                value
            }
        };

        let max_tokens = match get(MAX_TOKENS_VAR) {
            None => DEFAULT_MAX_TOKENS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: MAX_TOKENS_VAR,
                        value: raw,
                        reason: "must be a positive integer".to_string(),
                    })
                }
            },
        };

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
        })
    }
}

/// Seed the process environment from `.env` files. Variables already set in
/// the environment are never overridden.
///
/// With an explicit `env_file` only that file is read. Otherwise `./.env` is
/// read, then `../.env` if the API key is still missing. Returns the files
/// that were loaded.
pub fn load_dotenv(env_file: Option<&Path>) -> Vec<String> {
    let mut loaded = Vec::new();
    let mut try_load = |path: &Path| match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::info!("[Config] Loaded environment from '{}'", path.display());
            loaded.push(path.display().to_string());
        }
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("[Config] Failed to load '{}': {}", path.display(), e),
    };

    if let Some(path) = env_file {
        try_load(path);
        return loaded;
    }

    try_load(Path::new(".env"));
    if std::env::var(API_KEY_VAR).is_err() {
        try_load(Path::new("../.env"));
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let s = settings(&[(API_KEY_VAR, "sk-test")]).unwrap();
        assert_eq!(s.api_key, "sk-test");
        assert_eq!(s.base_url, DEFAULT_API_BASE);
        assert_eq!(s.model, DEFAULT_MODEL);
        assert_eq!(s.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(s.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_missing_or_blank_key_is_error() {
        assert!(matches!(
            settings(&[]),
            Err(ConfigError::MissingVar(API_KEY_VAR))
        ));
        assert!(matches!(
            settings(&[(API_KEY_VAR, "   ")]),
            Err(ConfigError::MissingVar(API_KEY_VAR))
        ));
    }

    #[test]
    fn test_placeholder_key_is_error() {
        let err = settings(&[(API_KEY_VAR, "your-api-key-here")]).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let s = settings(&[
            (API_KEY_VAR, "sk-test"),
            (API_BASE_VAR, "http://localhost:8080/v1/"),
            (MODEL_VAR, "llama3"),
            (TEMPERATURE_VAR, "0.2"),
            (MAX_TOKENS_VAR, "256"),
        ])
        .unwrap();
        assert_eq!(s.base_url, "http://localhost:8080/v1");
        assert_eq!(s.model, "llama3");
        assert_eq!(s.temperature, 0.2);
        assert_eq!(s.max_tokens, 256);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (var, value) in [
            (TEMPERATURE_VAR, "warm"),
            (TEMPERATURE_VAR, "2.5"),
            (TEMPERATURE_VAR, "NaN"),
            (MAX_TOKENS_VAR, "0"),
            (MAX_TOKENS_VAR, "-5"),
            (MAX_TOKENS_VAR, "lots"),
        ] {
            let err = settings(&[(API_KEY_VAR, "sk-test"), (var, value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidVar { name, .. } if name == var),
                "{var}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_base_url_requires_scheme() {
        let err = settings(&[(API_KEY_VAR, "sk-test"), (API_BASE_VAR, "api.openai.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: API_BASE_VAR, .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let s = settings(&[(API_KEY_VAR, "sk-secret-value")]).unwrap();
        let debug = format!("{s:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_explicit_env_file_missing_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_dotenv(Some(&dir.path().join("missing.env")));
        assert!(loaded.is_empty());
    }
}
