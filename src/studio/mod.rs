// src/studio/mod.rs — Prompt studio pipeline

pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod scorer;
pub mod types;

pub use pipeline::{select_best, Studio};
pub use types::{
    PromptStyle, PromptVariant, RefinedPrompt, StudioEvent, StudioParams, StudioRun, TestResult,
};
