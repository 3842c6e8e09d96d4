// src/studio/report.rs — Plain-text run report

use chrono::{DateTime, TimeZone, Utc};

use super::types::{RefinedPrompt, StudioParams, TestResult};

const RULE: &str = "==================";

/// Render the downloadable report. Variant texts, test outputs and the
/// refined prompt are copied verbatim.
pub fn render_report(
    params: &StudioParams,
    generated_at: DateTime<Utc>,
    results: &[TestResult],
    refined: &RefinedPrompt,
) -> String {
    let mut out = String::with_capacity(4096);

    line(&mut out, "PromptStudio Report");
    line(&mut out, RULE);
    line(&mut out, &format!("Generated: {}", generated_at.to_rfc3339()));
    line(
        &mut out,
        &format!("Original Rough Prompt: {}", params.rough_idea.trim()),
    );
    line(
        &mut out,
        &format!(
            "Model: {} | Creativity: {}/10 | Test Iterations: {}",
            params.model, params.creativity, params.iterations
        ),
    );
    out.push('\n');

    section(&mut out, "1. Generated Prompts");
    for result in results {
        let v = &result.variant;
        line(&mut out, &format!("Prompt {} ({}):", v.style.ordinal(), v.style));
        line(&mut out, &v.text);
        out.push('\n');
        line(&mut out, "Test Output:");
        line(&mut out, &result.output);
        out.push('\n');
        line(&mut out, &format!("Score: {}/100", result.score));
        out.push('\n');
    }

    section(&mut out, "2. Refined Prompt");
    let source = format!(
        "Refined from: Prompt {} ({})",
        refined.source.style.ordinal(),
        refined.source.style
    );
    let source_score = results
        .iter()
        .find(|r| r.variant == refined.source)
        .map(|r| r.score);
    match source_score {
        Some(score) => line(&mut out, &format!("{source}, score {score}/100")),
        None => line(&mut out, &source),
    }
    out.push('\n');
    line(&mut out, &refined.text);
    out.push('\n');

    section(&mut out, "3. Summary");
    let styles: Vec<&str> = results.iter().map(|r| r.variant.style.name()).collect();
    line(
        &mut out,
        &format!(
            "Processed {} prompts with styles: {}.",
            results.len(),
            styles.join(", ")
        ),
    );
    let best = results.iter().map(|r| r.score).max().unwrap_or(0);
    line(&mut out, &format!("Highest score: {best}/100."));
    line(
        &mut out,
        "Refinement improved the best prompt based on test feedback.",
    );
    line(&mut out, RULE);

    out
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    line(out, title);
    line(out, &"-".repeat(title.len()));
    out.push('\n');
}

/// Download name, e.g. `promptstudio_report_20251018_142301.txt`.
pub fn report_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("promptstudio_report_{}.txt", at.format("%Y%m%d_%H%M%S"))
}
