//! Config directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `$XDG_CONFIG_HOME/cinetui/config.toml`, falling
///   back to `~/.config/cinetui/config.toml` when the variable is unset
///   or empty.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when
/// `dir` is `None` and `XDG_CONFIG_HOME` does not apply).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let xdg = std::env::var("XDG_CONFIG_HOME").ok();
    let home = std::env::var("HOME").ok();
    config_file_under(xdg.as_deref(), home.as_deref())
}

/// Picks the config base directory per the XDG convention.
///
/// An empty `XDG_CONFIG_HOME` counts as unset.
fn config_file_under(xdg_config_home: Option<&str>, home: Option<&str>) -> Result<PathBuf> {
    let base = match xdg_config_home {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = home.context("HOME environment variable is not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(base.join("cinetui").join("config.toml"))
}
