// src/provider/catalog.rs — Models offered in the model selector

use super::ModelInfo;
use crate::infra::config::StudioConfig;

/// Free-tier OpenRouter models offered when the config does not list any.
const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("meta-llama/llama-3.3-70b-instruct:free", "Llama 3.3 70B Instruct"),
    ("mistralai/mistral-7b-instruct:free", "Mistral 7B Instruct"),
    ("google/gemma-3-27b-it:free", "Gemma 3 27B"),
    ("deepseek/deepseek-chat-v3-0324:free", "DeepSeek V3"),
    ("qwen/qwen-2.5-72b-instruct:free", "Qwen 2.5 72B Instruct"),
];

/// Ordered list of selectable models. The first entry is the default.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(id, name)| ModelInfo {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    /// Build from `[studio]`: an explicit `models` list replaces the
    /// built-in one, and `default_model` is moved (or inserted) to the front.
    pub fn from_config(config: &StudioConfig) -> Self {
        let mut catalog = if config.models.is_empty() {
            Self::builtin()
        } else {
            Self {
                models: config
                    .models
                    .iter()
                    .map(|id| ModelInfo {
                        id: id.clone(),
                        name: id.clone(),
                    })
                    .collect(),
            }
        };

        if let Some(ref default) = config.default_model {
            let entry = match catalog.models.iter().position(|m| &m.id == default) {
                Some(idx) => catalog.models.remove(idx),
                None => ModelInfo {
                    id: default.clone(),
                    name: default.clone(),
                },
            };
            catalog.models.insert(0, entry);
        }
        catalog
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn default_model(&self) -> Option<&ModelInfo> {
        self.models.first()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_not_empty() {
        let c = ModelCatalog::builtin();
        assert_eq!(c.models().len(), BUILTIN_MODELS.len());
        assert_eq!(
            c.default_model().unwrap().id,
            "meta-llama/llama-3.3-70b-instruct:free"
        );
    }

    #[test]
    fn test_config_list_replaces_builtin() {
        let cfg = StudioConfig {
            models: vec!["a/x".into(), "b/y".into()],
            ..Default::default()
        };
        let c = ModelCatalog::from_config(&cfg);
        assert_eq!(c.models().len(), 2);
        assert!(c.contains("b/y"));
        assert!(!c.contains("google/gemma-3-27b-it:free"));
    }

    #[test]
    fn test_default_model_moves_to_front() {
        let cfg = StudioConfig {
            default_model: Some("google/gemma-3-27b-it:free".into()),
            ..Default::default()
        };
        let c = ModelCatalog::from_config(&cfg);
        assert_eq!(c.default_model().unwrap().id, "google/gemma-3-27b-it:free");
        assert_eq!(c.models().len(), BUILTIN_MODELS.len());
    }

    #[test]
    fn test_unknown_default_model_is_inserted() {
        let cfg = StudioConfig {
            default_model: Some("custom/model".into()),
            ..Default::default()
        };
        let c = ModelCatalog::from_config(&cfg);
        assert_eq!(c.default_model().unwrap().id, "custom/model");
        assert_eq!(c.models().len(), BUILTIN_MODELS.len() + 1);
    }
}
