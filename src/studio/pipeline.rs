// src/studio/pipeline.rs — Generate → test → score → refine → report

use chrono::Utc;
use std::sync::Arc;

use super::prompts;
use super::report;
use super::scorer::ScoringPolicy;
use super::types::*;
use crate::infra::config::Config;
use crate::infra::errors::StudioError;
use crate::provider::{CompletionRequest, ModelClient};
use crate::util::log_preview;

type ProgressCallback = Box<dyn Fn(StudioEvent) + Send + Sync>;

/// Drives one linear studio run against a model client.
///
/// Every model call is awaited before the next one starts. A failed call in
/// generation, testing or refinement aborts the run; nothing partial is
/// returned.
pub struct Studio {
    client: Arc<dyn ModelClient>,
    scoring: ScoringPolicy,
    /// Writes and refines variants. `None` means the run's selected model.
    authoring_model: Option<String>,
    max_tokens: Option<u32>,
    on_progress: Option<ProgressCallback>,
}

impl Studio {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            scoring: ScoringPolicy::default(),
            authoring_model: None,
            max_tokens: None,
            on_progress: None,
        }
    }

    pub fn from_config(client: Arc<dyn ModelClient>, config: &Config) -> Self {
        Self::new(client)
            .with_scoring(config.scoring.clone())
            .with_authoring_model(config.studio.authoring_model.clone())
            .with_max_tokens(config.provider.max_tokens)
    }

    pub fn with_scoring(mut self, policy: ScoringPolicy) -> Self {
        self.scoring = policy;
        self
    }

    pub fn with_authoring_model(mut self, model: Option<String>) -> Self {
        self.authoring_model = model.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set a callback for stage transitions.
    pub fn with_progress(mut self, cb: impl Fn(StudioEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    fn emit(&self, event: StudioEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    fn authoring_model<'a>(&'a self, params: &'a StudioParams) -> &'a str {
        self.authoring_model.as_deref().unwrap_or(&params.model)
    }

    async fn complete(&self, model: &str, prompt: String, temperature: f32) -> Result<String, StudioError> {
        let mut request = CompletionRequest::new(model, prompt, temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        self.client.complete(request).await
    }

    /// Stage 1: one completion per style, in fixed style order.
    pub async fn generate(&self, params: &StudioParams) -> Result<Vec<PromptVariant>, StudioError> {
        let model = self.authoring_model(params);
        let mut variants = Vec::with_capacity(PromptStyle::ALL.len());

        for style in PromptStyle::ALL {
            self.emit(StudioEvent::Generating { style });
            let instruction = prompts::generation_prompt(params, style)?;
            let raw = self.complete(model, instruction, params.temperature()).await?;
            let text = prompts::clean_variant_text(&raw, style, &params.rough_idea);
            tracing::debug!("Generated {} variant: {}", style, log_preview(&text, 80));
            variants.push(PromptVariant { style, text });
        }

        Ok(variants)
    }

    /// Stage 2: send the variant text to the selected model `iterations` times.
    ///
    /// A single iteration yields the raw completion; several are labelled
    /// `Iteration N:` and joined by newlines.
    pub async fn test_variant(
        &self,
        variant: &PromptVariant,
        params: &StudioParams,
    ) -> Result<String, StudioError> {
        let iterations = params.iterations.max(MIN_ITERATIONS);
        let mut outputs = Vec::with_capacity(usize::from(iterations));

        for iteration in 1..=iterations {
            self.emit(StudioEvent::Testing {
                style: variant.style,
                iteration,
                iterations,
            });
            let output = self
                .complete(&params.model, variant.text.clone(), params.temperature())
                .await?;
            outputs.push(output);
        }

        if outputs.len() == 1 {
            return Ok(outputs.remove(0));
        }
        Ok(outputs
            .iter()
            .enumerate()
            .map(|(i, o)| format!("Iteration {}: {}", i + 1, o))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Stage 3: pure heuristic, no network.
    pub fn score(&self, output: &str, rough_idea: &str) -> u8 {
        self.scoring.score(output, rough_idea)
    }

    /// Stage 4: one refinement completion for the best result.
    pub async fn refine(
        &self,
        best: &TestResult,
        params: &StudioParams,
    ) -> Result<RefinedPrompt, StudioError> {
        self.emit(StudioEvent::Refining {
            style: best.variant.style,
            score: best.score,
        });
        let instruction = prompts::refinement_prompt(&best.variant.text, &best.output, best.score)?;
        let raw = self
            .complete(self.authoring_model(params), instruction, params.temperature())
            .await?;

        let text = match raw.trim() {
            "" => {
                tracing::warn!(
                    "Empty refinement for {} variant, keeping the original text",
                    best.variant.style
                );
                best.variant.text.clone()
            }
            refined => refined.to_string(),
        };

        Ok(RefinedPrompt {
            source: best.variant.clone(),
            text,
        })
    }

    /// Run all five stages.
    pub async fn run(&self, params: StudioParams) -> Result<StudioRun, StudioError> {
        params.validate()?;

        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            run_id = %id,
            model = %params.model,
            creativity = params.creativity,
            iterations = params.iterations,
            "Running PromptStudio for: {}",
            log_preview(&params.rough_idea, 60)
        );

        match self.run_stages(id.clone(), params).await {
            Ok(run) => {
                tracing::info!(
                    run_id = %run.id,
                    best_score = run.best_score(),
                    "PromptStudio completed: {} prompts processed",
                    run.results.len()
                );
                Ok(run)
            }
            Err(e) => {
                tracing::error!(run_id = %id, "PromptStudio run failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_stages(&self, id: String, params: StudioParams) -> Result<StudioRun, StudioError> {
        let started_at = Utc::now();

        let variants = self.generate(&params).await?;

        let mut results = Vec::with_capacity(variants.len());
        for variant in variants {
            let output = self.test_variant(&variant, &params).await?;
            let score = self.score(&output, &params.rough_idea);
            tracing::info!("Scored {} variant: {}/100", variant.style, score);
            self.emit(StudioEvent::Scored {
                style: variant.style,
                score,
            });
            results.push(TestResult {
                variant,
                output,
                score,
            });
        }

        let best = select_best(&results).ok_or_else(|| {
            StudioError::Other(anyhow::anyhow!("no variants were tested"))
        })?;
        let refined = self.refine(best, &params).await?;

        let report = report::render_report(&params, started_at, &results, &refined);
        let run = StudioRun {
            id,
            started_at,
            params,
            results,
            refined,
            report,
        };
        self.emit(StudioEvent::Complete {
            best_score: run.best_score(),
        });
        Ok(run)
    }
}

/// Highest score wins; on a tie the earliest result (generation order) is kept.
pub fn select_best(results: &[TestResult]) -> Option<&TestResult> {
    results.iter().fold(None, |best, r| match best {
        Some(b) if b.score >= r.score => Some(b),
        _ => Some(r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(style: PromptStyle, score: u8) -> TestResult {
        TestResult {
            variant: PromptVariant {
                style,
                text: style.name().into(),
            },
            output: String::new(),
            score,
        }
    }

    #[test]
    fn test_select_best_strict_max() {
        let results = vec![
            result(PromptStyle::Concise, 40),
            result(PromptStyle::Detailed, 70),
            result(PromptStyle::Structured, 60),
            result(PromptStyle::Creative, 69),
        ];
        assert_eq!(
            select_best(&results).unwrap().variant.style,
            PromptStyle::Detailed
        );
    }

    #[test]
    fn test_select_best_tie_goes_to_earliest() {
        let results = vec![
            result(PromptStyle::Concise, 10),
            result(PromptStyle::Detailed, 80),
            result(PromptStyle::Structured, 80),
            result(PromptStyle::Creative, 80),
        ];
        assert_eq!(
            select_best(&results).unwrap().variant.style,
            PromptStyle::Detailed
        );
    }

    #[test]
    fn test_select_best_all_equal() {
        let results: Vec<TestResult> = PromptStyle::ALL.iter().map(|s| result(*s, 10)).collect();
        assert_eq!(
            select_best(&results).unwrap().variant.style,
            PromptStyle::Concise
        );
    }

    #[test]
    fn test_select_best_empty() {
        assert!(select_best(&[]).is_none());
    }
}
