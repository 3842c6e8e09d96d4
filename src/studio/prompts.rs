// src/studio/prompts.rs — Meta-prompt templates and completion clean-up

use minijinja::{context, Environment};

use super::types::{PromptStyle, StudioParams};
use crate::util::preview;

/// How much of a test output the refinement prompt quotes.
pub const FEEDBACK_EXCERPT_CHARS: usize = 200;

const GENERATE_TEMPLATE: &str = r#"You are an expert prompt engineer. Write one professional prompt for the rough prompt idea "{{ rough_idea }}".

Style: {{ style }} - {{ guidance }}.
Make the prompt {{ modifier }}, relevant to the topic, and optimized for clarity and effectiveness.

Example {{ style }} prompt for the rough idea "Write a blog about AI trends":
{{ example }}

Return only the {{ style }} prompt for "{{ rough_idea }}", with no label or commentary."#;

const REFINE_TEMPLATE: &str = r#"You are an expert prompt engineer tasked with refining the following prompt to improve its clarity, specificity, and effectiveness.

Original prompt:
{{ prompt }}

Test output (excerpt):
{{ output_excerpt }}

Score: {{ score }}/100
Suggested refinements: {{ suggestions }}

Return only the refined prompt."#;

fn example_for(style: PromptStyle) -> &'static str {
    match style {
        PromptStyle::Concise => {
            "Write a 500-word blog on key AI trends in 2025, focusing on industry impacts."
        }
        PromptStyle::Detailed => {
            "Write a 1000-word blog exploring AI trends in 2025, including case studies, data, \
             and predictions, in a professional tone for tech executives."
        }
        PromptStyle::Structured => {
            "Write a 750-word blog on AI trends, covering:\n   - Current advancements\n   \
             - Industry applications\n   - Future outlook"
        }
        PromptStyle::Creative => {
            "Craft a 600-word blog as a futuristic AI narrating 2025 trends, blending humor and insight."
        }
    }
}

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("generate", GENERATE_TEMPLATE)?;
    env.add_template("refine", REFINE_TEMPLATE)?;
    Ok(env)
}

/// Instruction asking the model for one variant in `style`.
pub fn generation_prompt(
    params: &StudioParams,
    style: PromptStyle,
) -> Result<String, minijinja::Error> {
    let env = environment()?;
    env.get_template("generate")?.render(context! {
        rough_idea => params.rough_idea.trim(),
        style => style.name(),
        guidance => style.guidance(),
        modifier => params.creativity_modifier(),
        example => example_for(style),
    })
}

/// Instruction asking the model to improve the best variant given its test feedback.
pub fn refinement_prompt(
    prompt: &str,
    output: &str,
    score: u8,
) -> Result<String, minijinja::Error> {
    let suggestions = refinement_suggestions(prompt, output, score);
    let suggestions = if suggestions.is_empty() {
        "None".to_string()
    } else {
        suggestions.join(" ")
    };

    let env = environment()?;
    env.get_template("refine")?.render(context! {
        prompt => prompt,
        output_excerpt => preview(output, FEEDBACK_EXCERPT_CHARS),
        score => score,
        suggestions => suggestions,
    })
}

/// Concrete refinement hints derived from the test feedback.
pub fn refinement_suggestions(prompt: &str, output: &str, score: u8) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if score < 80 {
        hints.push("Add more specific instructions for clarity.");
    }
    if output.split_whitespace().count() < 50 {
        hints.push("Increase the expected output length.");
    }
    let mentions_audience = prompt
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| matches!(w.to_lowercase().as_str(), "tone" | "style" | "audience"));
    if !mentions_audience {
        hints.push("Specify tone and target audience.");
    }
    hints
}

/// Turn a raw generation completion into variant text.
///
/// Drops an echoed style label, falls back to the rough idea when the model
/// returned nothing, and makes sure the text names its style.
pub fn clean_variant_text(raw: &str, style: PromptStyle, rough_idea: &str) -> String {
    let body = strip_style_label(raw.trim(), style).trim();
    let body = if body.is_empty() {
        tracing::warn!("Empty {} generation, falling back to the rough idea", style);
        rough_idea.trim()
    } else {
        body
    };

    if body.to_lowercase().contains(&style.name().to_lowercase()) {
        body.to_string()
    } else {
        format!("{body}\n\nStyle: {}.", style.name())
    }
}

fn strip_style_label(text: &str, style: PromptStyle) -> &str {
    let numbered = format!("{}. ", style.ordinal());
    let text = text.strip_prefix(numbered.as_str()).unwrap_or(text);

    let name = style.name();
    let labels = [
        format!("**{name}**:"),
        format!("**{name}:**"),
        format!("{name}:"),
    ];
    for label in &labels {
        if let Some(head) = text.get(..label.len()) {
            if head.eq_ignore_ascii_case(label) {
                return &text[label.len()..];
            }
        }
    }
    text
}
