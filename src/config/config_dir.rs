use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

const CONFIG_FILE: &str = "config.toml";

pub fn find_config_file(use_local: bool) -> PathBuf {
    if use_local {
        return PathBuf::from(".").join(CONFIG_FILE);
    }

    #[cfg(unix)]
    let home = std::env::var_os("HOME");
    #[cfg(windows)]
    let home = std::env::var_os("APPDATA");
    #[cfg(not(any(unix, windows)))]
    let home: Option<std::ffi::OsString> = None;

    home.map(PathBuf::from)
        .and_then(|home| find_user_config(&home))
        .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_FILE))
}

/// `<home>/.config/<app>/config.toml` on unix, `<home>/<app>/config.toml` elsewhere, if it exists.
fn find_user_config(home: &Path) -> Option<PathBuf> {
    let mut path = home.to_path_buf();
    if cfg!(unix) {
        path = path.join(".config");
    }
    path = path.join(crate::APPLICATION_NAME).join(CONFIG_FILE);

    path.exists().then_some(path)
}

pub fn read_config(use_local: bool) -> ConfigResult<String> {
    read_config_from(&find_config_file(use_local))
}

pub fn read_config_from(filename: &Path) -> ConfigResult<String> {
    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: filename.to_path_buf(),
        });
    }

    debug!("using {} as configuration file", filename.display());
    Ok(std::fs::read_to_string(filename)?)
}
