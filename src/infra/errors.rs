// src/infra/errors.rs — Error types for PromptStudio

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    // Provider errors
    #[error("Authentication with '{provider}' failed: {message}")]
    Auth { provider: String, message: String },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Transport error talking to '{provider}': {message}")]
    Transport { provider: String, message: String },

    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    // User errors
    #[error("Invalid input: {0}")]
    Validation(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudioError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            StudioError::RateLimited { .. } | StudioError::Transport { .. }
        )
    }

    /// Stable lowercase tag used by the web UI to pick a message style.
    pub fn kind(&self) -> &'static str {
        match self {
            StudioError::Auth { .. } => "auth",
            StudioError::RateLimited { .. } => "rate_limit",
            StudioError::Transport { .. } => "transport",
            StudioError::Provider { .. } => "provider",
            StudioError::Validation(_) => "validation",
            StudioError::Config(_) => "config",
            StudioError::Template(_) => "template",
            StudioError::Io(_) => "io",
            StudioError::Other(_) => "other",
        }
    }

    /// What the user should do next, if there is anything useful to say.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StudioError::Auth { .. } => Some(
                "Check that the API key variable named by [provider] api_key_env holds a valid key, then restart.",
            ),
            StudioError::RateLimited { .. } => {
                Some("The provider is throttling requests. Wait a moment and run again.")
            }
            StudioError::Transport { .. } => {
                Some("Check your internet connection and run again.")
            }
            StudioError::Validation(_) => Some("Enter a rough prompt idea before running."),
            StudioError::Config(_) => Some("Fix the configuration file and restart."),
            _ => None,
        }
    }

    pub fn missing_credential(provider: &str, env_var: &str) -> Self {
        StudioError::Auth {
            provider: provider.to_string(),
            message: format!("no API key found in ${env_var}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_classification() {
        assert!(StudioError::RateLimited {
            provider: "p".into(),
            retry_after_ms: 10,
        }
        .is_retriable());
        assert!(StudioError::Transport {
            provider: "p".into(),
            message: "timeout".into(),
        }
        .is_retriable());
        assert!(!StudioError::Auth {
            provider: "p".into(),
            message: "bad key".into(),
        }
        .is_retriable());
        assert!(!StudioError::Validation("empty".into()).is_retriable());
        assert!(!StudioError::Provider {
            provider: "p".into(),
            message: "HTTP 400".into(),
        }
        .is_retriable());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(StudioError::Validation("x".into()).kind(), "validation");
        assert_eq!(
            StudioError::missing_credential("openrouter", "OPENROUTER_API_KEY").kind(),
            "auth"
        );
    }

    #[test]
    fn test_hints_for_recoverable_errors() {
        let rl = StudioError::RateLimited {
            provider: "p".into(),
            retry_after_ms: 0,
        };
        assert!(rl.hint().unwrap().contains("run again"));
        let tr = StudioError::Transport {
            provider: "p".into(),
            message: "reset".into(),
        };
        assert!(tr.hint().unwrap().contains("run again"));
        assert!(StudioError::Other(anyhow::anyhow!("x")).hint().is_none());
    }

    #[test]
    fn test_auth_hint_does_not_name_a_fixed_variable() {
        let e = StudioError::missing_credential("openrouter", "MY_KEY");
        let hint = e.hint().unwrap();
        assert!(hint.contains("api_key_env"));
        assert!(!hint.contains("OPENROUTER_API_KEY"));
        assert!(e.to_string().contains("$MY_KEY"));
    }

    #[test]
    fn test_missing_credential_message() {
        let e = StudioError::missing_credential("openrouter", "OPENROUTER_API_KEY");
        assert_eq!(
            e.to_string(),
            "Authentication with 'openrouter' failed: no API key found in $OPENROUTER_API_KEY"
        );
    }
}
