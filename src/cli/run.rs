// src/cli/run.rs — Default command: run the studio once from the terminal

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::infra::config::Config;
use crate::provider::ModelClient;
use crate::studio::report::report_file_name;
use crate::studio::{Studio, StudioParams, StudioRun};

pub struct RunOptions {
    pub quiet: bool,
    /// Report destination. `None` picks a timestamped name in the current directory.
    pub output: Option<PathBuf>,
    pub write_report: bool,
}

/// Run all stages, print the results and save the report.
pub async fn run_studio(
    client: Arc<dyn ModelClient>,
    config: &Config,
    params: StudioParams,
    opts: &RunOptions,
) -> anyhow::Result<StudioRun> {
    let mut studio = Studio::from_config(client, config);
    if !opts.quiet {
        studio = studio.with_progress(super::progress::terminal_progress());
        eprintln!(
            "[studio] {} | model: {} | creativity: {}/10 | iterations: {}",
            crate::util::log_preview(&params.rough_idea, 60),
            params.model,
            params.creativity,
            params.iterations,
        );
    }

    let run = studio.run(params).await?;

    print!("{}", render_summary(&run));

    if opts.write_report {
        let path = opts
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(report_file_name(&chrono::Local::now())));
        write_report(&run, &path)?;
        if !opts.quiet {
            eprintln!("[report] saved to {}", path.display());
        }
    }

    Ok(run)
}

/// Terminal rendering: variants, their test outputs and scores, then the
/// refined prompt.
pub fn render_summary(run: &StudioRun) -> String {
    let mut lines = vec!["== Generated Prompts ==".to_string()];
    for r in &run.results {
        lines.push(format!(
            "\n--- Prompt {} ({}) ---",
            r.variant.style.ordinal(),
            r.variant.style
        ));
        lines.push(r.variant.text.clone());
    }

    lines.push("\n== Test Results and Scores ==".to_string());
    for r in &run.results {
        lines.push(format!(
            "\n--- Prompt {} ({}) - Score: {}/100 ---",
            r.variant.style.ordinal(),
            r.variant.style,
            r.score
        ));
        lines.push(format!("Test Output:\n{}", r.output));
    }

    lines.push(format!(
        "\n== Refined Prompt (from {}) ==",
        run.refined.source.style
    ));
    lines.push(run.refined.text.clone());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn write_report(run: &StudioRun, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &run.report)
        .map_err(|e| anyhow::anyhow!("Failed to write report to {}: {e}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
