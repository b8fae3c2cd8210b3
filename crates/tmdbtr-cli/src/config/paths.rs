//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory name under the config root.
const APP_DIR: &str = "tmdbtr";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// 1. `{dir}/config.toml` when `--dir` is given.
/// 2. `$XDG_CONFIG_HOME/tmdbtr/config.toml` when the variable is non-empty.
/// 3. `~/.config/tmdbtr/config.toml` otherwise.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

/// Pure resolution logic behind [`resolve_config_path`].
fn config_path_from(
    dir: Option<&Path>,
    xdg: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(x) = xdg.filter(|x| !x.as_os_str().is_empty()) {
        return Ok(x.join(APP_DIR).join(CONFIG_FILE));
    }
    match home {
        Some(h) => Ok(h.join(".config").join(APP_DIR).join(CONFIG_FILE)),
        None => bail!("HOME environment variable is not set"),
    }
}
