// src/infra/paths.rs — Config path resolution
//
// PROMPTSTUDIO_HOME overrides everything. Otherwise config lives in
// ~/.promptstudio/, falling back to the platform config dir when no home
// directory can be determined.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the PROMPTSTUDIO_HOME override, if set.
fn studio_home() -> Option<PathBuf> {
    std::env::var_os("PROMPTSTUDIO_HOME").map(PathBuf::from)
}

/// Configuration directory: $PROMPTSTUDIO_HOME/ or ~/.promptstudio/
pub fn config_dir() -> PathBuf {
    if let Some(home) = studio_home() {
        return home;
    }
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".promptstudio");
    }
    ProjectDirs::from("", "", "promptstudio")
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".promptstudio"))
}

/// Main config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
