// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::provider::ModelInfo;
use crate::studio::{PromptStyle, StudioRun};

/// Request body for starting a run. Missing fields fall back to the
/// server's configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub creativity: Option<u8>,
    #[serde(default)]
    pub iterations: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

/// Response for the model selector.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default_model: Option<String>,
    pub creativity: Bounds,
    pub iterations: Bounds,
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    pub number: usize,
    pub style: PromptStyle,
    pub prompt: String,
    pub output: String,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct RefinedView {
    pub from_number: usize,
    pub from_style: PromptStyle,
    pub text: String,
}

/// What the page renders after a run.
#[derive(Debug, Serialize)]
pub struct RunView {
    pub id: String,
    pub started_at: String,
    pub idea: String,
    pub model: String,
    pub creativity: u8,
    pub iterations: u8,
    pub results: Vec<ResultView>,
    pub refined: RefinedView,
    pub best_score: u8,
    pub report_url: String,
}

impl From<&StudioRun> for RunView {
    fn from(run: &StudioRun) -> Self {
        Self {
            id: run.id.clone(),
            started_at: run.started_at.to_rfc3339(),
            idea: run.params.rough_idea.clone(),
            model: run.params.model.clone(),
            creativity: run.params.creativity,
            iterations: run.params.iterations,
            results: run
                .results
                .iter()
                .map(|r| ResultView {
                    number: r.variant.style.ordinal(),
                    style: r.variant.style,
                    prompt: r.variant.text.clone(),
                    output: r.output.clone(),
                    score: r.score,
                })
                .collect(),
            refined: RefinedView {
                from_number: run.refined.source.style.ordinal(),
                from_style: run.refined.source.style,
                text: run.refined.text.clone(),
            },
            best_score: run.best_score(),
            report_url: "/api/v1/report".into(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
