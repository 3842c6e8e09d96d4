// src/studio/types.rs — Studio domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::infra::errors::StudioError;

pub const MIN_CREATIVITY: u8 = 1;
pub const MAX_CREATIVITY: u8 = 10;
pub const MIN_ITERATIONS: u8 = 1;
pub const MAX_ITERATIONS: u8 = 3;

/// The four fixed variant styles, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptStyle {
    Concise,
    Detailed,
    Structured,
    Creative,
}

impl PromptStyle {
    pub const ALL: [PromptStyle; 4] = [
        PromptStyle::Concise,
        PromptStyle::Detailed,
        PromptStyle::Structured,
        PromptStyle::Creative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptStyle::Concise => "Concise",
            PromptStyle::Detailed => "Detailed",
            PromptStyle::Structured => "Structured",
            PromptStyle::Creative => "Creative",
        }
    }

    /// 1-based position in generation order.
    pub fn ordinal(self) -> usize {
        match self {
            PromptStyle::Concise => 1,
            PromptStyle::Detailed => 2,
            PromptStyle::Structured => 3,
            PromptStyle::Creative => 4,
        }
    }

    /// What a prompt in this style should look like.
    pub fn guidance(self) -> &'static str {
        match self {
            PromptStyle::Concise => "a short, direct prompt (50-100 words)",
            PromptStyle::Detailed => {
                "a comprehensive prompt (150-200 words) with specific instructions"
            }
            PromptStyle::Structured => {
                "a prompt (100-150 words) using bullet points or numbered steps"
            }
            PromptStyle::Creative => {
                "a novel, engaging prompt (100-150 words) with a unique angle"
            }
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVariant {
    pub style: PromptStyle,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub variant: PromptVariant,
    pub output: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedPrompt {
    pub source: PromptVariant,
    pub text: String,
}

/// User input for one studio run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioParams {
    pub rough_idea: String,
    pub model: String,
    pub creativity: u8,
    pub iterations: u8,
}

impl StudioParams {
    pub fn new(rough_idea: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            rough_idea: rough_idea.into(),
            model: model.into(),
            creativity: 5,
            iterations: MIN_ITERATIONS,
        }
    }

    pub fn with_creativity(mut self, creativity: u8) -> Self {
        self.creativity = creativity;
        self
    }

    pub fn with_iterations(mut self, iterations: u8) -> Self {
        self.iterations = iterations;
        self
    }

    /// Runs before any network call.
    pub fn validate(&self) -> Result<(), StudioError> {
        if self.rough_idea.trim().is_empty() {
            return Err(StudioError::Validation(
                "Please enter a rough prompt idea.".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(StudioError::Validation("Please select a model.".into()));
        }
        if !(MIN_CREATIVITY..=MAX_CREATIVITY).contains(&self.creativity) {
            return Err(StudioError::Validation(format!(
                "Creativity must be between {MIN_CREATIVITY} and {MAX_CREATIVITY}."
            )));
        }
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(StudioError::Validation(format!(
                "Test iterations must be between {MIN_ITERATIONS} and {MAX_ITERATIONS}."
            )));
        }
        Ok(())
    }

    /// Creativity 1..=10 maps linearly onto temperature 0.1..=1.0.
    pub fn temperature(&self) -> f32 {
        f32::from(self.creativity.clamp(MIN_CREATIVITY, MAX_CREATIVITY)) / 10.0
    }

    pub fn creativity_modifier(&self) -> &'static str {
        match self.creativity {
            c if c > 7 => "highly creative and innovative",
            c if c > 4 => "moderately creative",
            _ => "clear and straightforward",
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioRun {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub params: StudioParams,
    pub results: Vec<TestResult>,
    pub refined: RefinedPrompt,
    pub report: String,
}

impl StudioRun {
    pub fn variants(&self) -> impl Iterator<Item = &PromptVariant> {
        self.results.iter().map(|r| &r.variant)
    }

    pub fn best_score(&self) -> u8 {
        self.results.iter().map(|r| r.score).max().unwrap_or(0)
    }
}

/// Stage transitions reported while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    Generating { style: PromptStyle },
    Testing {
        style: PromptStyle,
        iteration: u8,
        iterations: u8,
    },
    Scored { style: PromptStyle, score: u8 },
    Refining { style: PromptStyle, score: u8 },
    Complete { best_score: u8 },
}
