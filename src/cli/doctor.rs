// src/cli/doctor.rs — Configuration and credential check

use std::path::Path;

use crate::infra::config::Config;
use crate::infra::paths;
use crate::provider::catalog::ModelCatalog;
use crate::provider::credential::Credential;
use crate::provider::openrouter::OpenRouterClient;

/// Print what the studio would run with and whether the API key works.
/// Returns an error when the key is missing or rejected.
pub async fn run_doctor(config: &Config, config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("promptstudio v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let default_path = paths::config_file_path();
    let path = config_path.unwrap_or(&default_path);
    if path.exists() {
        println!("  Config:     {} (loaded)", path.display());
    } else {
        println!("  Config:     (using defaults)");
    }
    println!("  Endpoint:   {}", config.provider.base_url);

    let catalog = ModelCatalog::from_config(&config.studio);
    match catalog.default_model() {
        Some(m) => println!("  Model:      {} ({} available)", m.id, catalog.models().len()),
        None => println!("  Model:      (none configured)"),
    }
    println!(
        "  Defaults:   creativity {}/10, {} test iteration(s)",
        config.studio.creativity, config.studio.iterations
    );

    let credential = Credential::from_env(&config.provider.api_key_env);
    if !credential.is_present() {
        println!("  API key:    missing (set {})", credential.env_var());
        anyhow::bail!("{} is not set", credential.env_var());
    }
    println!("  API key:    {} (set)", credential.env_var());

    let client = OpenRouterClient::from_config(credential, &config.provider)?;
    match client.verify_credential().await {
        Ok(()) => {
            println!("  Verified:   yes");
            Ok(())
        }
        Err(e) => {
            println!("  Verified:   no ({})", e.kind());
            Err(e.into())
        }
    }
}
