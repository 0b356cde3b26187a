// Platform directory utilities.
// Locates the config file and the log file for the current user.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "pokedex")
}

/// Get the base cache directory (~/.cache/pokedex on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory (~/.config/pokedex on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the optional JSON config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Path to the diagnostic log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("pokedex.log"))
}
