use serde::Deserialize;

use crate::content::{ValidationScope, Validator};

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    validation: ValidationConfig,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    database_uri: String,
    #[serde(default)]
    docs: bool,
}

/// How submitted documents are checked before they are stored.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    scope: ValidationScope,
    #[serde(default)]
    check_answers: bool,
}

impl Config {
    pub fn parse(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let source = read_config(use_local)?;
                    Self::parse(&source)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}

impl ValidationConfig {
    pub fn validator(&self) -> Validator {
        Validator::new(self.scope, self.check_answers)
    }
}
