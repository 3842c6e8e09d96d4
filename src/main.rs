// src/main.rs — PromptStudio entry point

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use promptstudio::api::{self, ApiState};
use promptstudio::cli::run::RunOptions;
use promptstudio::cli::{Cli, Commands};
use promptstudio::infra::config::Config;
use promptstudio::infra::errors::StudioError;
use promptstudio::infra::logger;
use promptstudio::provider::catalog::ModelCatalog;
use promptstudio::provider::credential::Credential;
use promptstudio::provider::openrouter::OpenRouterClient;
use promptstudio::provider::retry::{RetryClient, RetryConfig};
use promptstudio::provider::ModelClient;
use promptstudio::studio::{Studio, StudioParams};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The server logs requests by default; the one-shot CLI stays quiet.
    let level = match cli.command {
        Some(Commands::Serve { .. }) => "info",
        _ => "warn",
    };
    logger::init_logging(level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        if let Some(hint) = e.downcast_ref::<StudioError>().and_then(|se| se.hint()) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match config_path {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Models) => {
            promptstudio::cli::models::list_models(&ModelCatalog::from_config(&config.studio));
            Ok(())
        }
        Some(Commands::Doctor) => {
            promptstudio::cli::doctor::run_doctor(&config, config_path.as_deref()).await
        }
        Some(Commands::Serve { ref host, port }) => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host.clone();
            }
            if let Some(port) = port {
                server.port = port;
            }
            let openrouter = build_openrouter(&config)?;
            if let Err(e) = openrouter.verify_credential().await {
                // Runs will fail the same way; the page shows the error per run.
                tracing::warn!("API key check failed: {e}");
            }
            let client = with_retry(openrouter, &config);
            let state = ApiState::new(Studio::from_config(client, &config), &config);
            api::start_server(&server, state).await
        }
        None => {
            let catalog = ModelCatalog::from_config(&config.studio);
            let model = resolve_model(&cli, &catalog)?;
            let idea = build_idea_input(&cli)?;
            let params = StudioParams::new(idea, model)
                .with_creativity(cli.creativity.unwrap_or(config.studio.creativity))
                .with_iterations(cli.iterations.unwrap_or(config.studio.iterations));

            let client = with_retry(build_openrouter(&config)?, &config);
            let opts = RunOptions {
                quiet: cli.quiet,
                output: cli.output.as_ref().map(PathBuf::from),
                write_report: !cli.no_report,
            };
            promptstudio::cli::run::run_studio(client, &config, params, &opts).await?;
            Ok(())
        }
    }
}

fn build_openrouter(config: &Config) -> anyhow::Result<OpenRouterClient> {
    let credential = Credential::from_env(&config.provider.api_key_env);
    Ok(OpenRouterClient::from_config(credential, &config.provider)?)
}

fn with_retry(client: OpenRouterClient, config: &Config) -> Arc<dyn ModelClient> {
    Arc::new(RetryClient::with_config(
        Arc::new(client),
        RetryConfig::from(&config.retry),
    ))
}

/// Model priority: --select-model picker > --model > config/catalog default.
fn resolve_model(cli: &Cli, catalog: &ModelCatalog) -> anyhow::Result<String> {
    if cli.select_model || cli.model.as_deref() == Some("?") {
        return select_model_interactive(catalog);
    }
    if let Some(ref model) = cli.model {
        if !catalog.contains(model) {
            tracing::warn!("Model '{model}' is not in the catalog; using it as given");
        }
        return Ok(model.clone());
    }
    catalog
        .default_model()
        .map(|m| m.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No model configured. Pass --model or set [studio] default_model."))
}

fn select_model_interactive(catalog: &ModelCatalog) -> anyhow::Result<String> {
    let models = catalog.models();
    if models.is_empty() {
        anyhow::bail!("No models configured. Set [studio] models in config.toml.");
    }

    let display_list: Vec<String> = models
        .iter()
        .map(|m| format!("{:<44} {}", m.id, m.name))
        .collect();

    let choice = inquire::Select::new("Select a model:", display_list.clone())
        .with_help_message("Use arrow keys to browse, type to filter")
        .with_page_size(10)
        .prompt()
        .map_err(|_| anyhow::anyhow!("Model selection cancelled"))?;

    let idx = display_list
        .iter()
        .position(|d| *d == choice)
        .unwrap_or(0);
    Ok(models[idx].id.clone())
}

/// Rough idea from args, stdin, or an interactive prompt. An empty idea is
/// passed through so the studio reports it as a validation error.
fn build_idea_input(cli: &Cli) -> anyhow::Result<String> {
    use std::io::IsTerminal;

    let has_args = !cli.idea.is_empty();
    let stdin_is_pipe = !std::io::stdin().is_terminal();

    if cli.stdin || (stdin_is_pipe && !has_args) {
        read_stdin()
    } else if has_args {
        Ok(cli.idea.join(" "))
    } else if std::io::stdin().is_terminal() {
        let idea = inquire::Text::new("Rough prompt idea:")
            .with_help_message("e.g. Write a blog about AI trends (Esc to cancel)")
            .prompt()
            .map_err(|_| anyhow::anyhow!("Input cancelled"))?;
        Ok(idea.trim().to_string())
    } else {
        anyhow::bail!("Usage: promptstudio <rough idea>. Run promptstudio --help for all options.")
    }
}

fn read_stdin() -> anyhow::Result<String> {
    use std::io::Read;
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}
