// src/provider/credential.rs — API key loaded once at startup

use std::fmt;

/// The provider API key, read from the environment exactly once and then
/// passed explicitly to the client that needs it.
#[derive(Clone)]
pub struct Credential {
    env_var: String,
    key: Option<String>,
}

impl Credential {
    /// Read the key from `env_var`. Blank values count as missing.
    pub fn from_env(env_var: &str) -> Self {
        let key = std::env::var(env_var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if key.is_none() {
            tracing::warn!("No API key in ${env_var}; model calls will fail with an auth error");
        }
        Self {
            env_var: env_var.to_string(),
            key,
        }
    }

    pub fn new(env_var: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            env_var: env_var.into(),
            key: (!key.trim().is_empty()).then_some(key),
        }
    }

    pub fn missing(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            key: None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn is_present(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("env_var", &self.env_var)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_key() {
        let c = Credential::new("OPENROUTER_API_KEY", "sk-or-v1-abc");
        assert!(c.is_present());
        assert_eq!(c.key(), Some("sk-or-v1-abc"));
        assert_eq!(c.env_var(), "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_blank_key_is_missing() {
        assert!(!Credential::new("K", "   ").is_present());
        assert!(!Credential::missing("K").is_present());
    }

    #[test]
    fn test_from_env_unset_var() {
        let c = Credential::from_env("PROMPTSTUDIO_TEST_SURELY_UNSET_VAR");
        assert!(!c.is_present());
    }

    #[test]
    fn test_debug_redacts_key() {
        let c = Credential::new("K", "secret-value");
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("secret-value"));
        assert!(dbg.contains("<redacted>"));
    }
}
