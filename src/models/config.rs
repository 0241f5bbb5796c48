//! Configuration model loaded from external sources.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::pagination::PageSize;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_STATE_FILE: &str = ".mehfil-admin/state.json";

#[derive(Clone, Debug, Deserialize, PartialEq)]
/// Settings of the admin client.
pub struct ClientConfig {
    /// Base URL every API path is appended to.
    pub api_url: String,
    pub debounce_ms: u64,
    pub default_page_size: u32,
    /// Where language and session survive restarts.
    pub state_file: PathBuf,
}

impl ClientConfig {
    /// Reads, in increasing priority: built-in defaults, `config/default`,
    /// `config/{APP_ENV}`, `file` and `APP_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        let mut builder = Config::builder()
            .set_default("debounce_ms", DEFAULT_DEBOUNCE_MS as i64)?
            .set_default("default_page_size", i64::from(PageSize::default().get()))?
            .set_default("state_file", DEFAULT_STATE_FILE)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false));
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let config: ClientConfig = builder
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "api_url is empty; set it in the config file or APP_API_URL".to_string(),
            ));
        }
        self.page_size().map(|_| ())
    }

    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        PageSize::try_from(self.default_page_size).map_err(|size| {
            ConfigError::Message(format!("default_page_size {size} is not one of 5, 10, 25, 50, 100"))
        })
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
