use std::{
    env,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = ".fence-highlight.toml";

/// Locate the config file
///
/// Searches in order:
/// 1. `.fence-highlight.toml` in the current working directory
/// 2. `.fence-highlight.toml` in the home directory
/// 3. `config.toml` in the platform config directory (see [`crate::paths`])
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = env::current_dir().ok();
    let home = env::var_os("HOME").map(PathBuf::from);
    let global = crate::paths::global_config_path().ok();

    find_config_file_in(cwd.as_deref(), home.as_deref(), global)
}

/// Load config file content from the first location that has one
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    let path = find_config_file()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(e) => {
            log::warn!("Failed to read config file {}: {}", path.display(), e);
            None
        }
    }
}

fn find_config_file_in(
    cwd: Option<&Path>,
    home: Option<&Path>,
    global: Option<PathBuf>,
) -> Option<PathBuf> {
    cwd.map(|dir| dir.join(CONFIG_FILE))
        .into_iter()
        .chain(home.map(|dir| dir.join(CONFIG_FILE)))
        .chain(global)
        .find(|candidate| candidate.is_file())
}
