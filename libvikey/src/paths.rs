//! Config file location.
//!
//! - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/vikey/config.toml`
//! - Else: the platform config dir from `dirs` (`~/.config/vikey/config.toml` on Linux)

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "vikey";
const CONFIG_FILE: &str = "config.toml";

/// Base config directory, if the platform has one.
pub fn config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|config| config.join(APP_DIR))
}

/// `<config dir>/vikey/config.toml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name() {
        if let Some(path) = config_file() {
            assert!(path.ends_with("vikey/config.toml"));
        }
    }
}
