use crate::persistence::DEFAULT_TASK_FILE;
use crate::validation::DEFAULT_MAX_DESCRIPTION_LENGTH;
use log::LevelFilter;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "task-console.toml";
pub const ENV_PREFIX: &str = "TASK_CONSOLE";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_file")]
    pub file: PathBuf,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            max_description_length: default_max_description_length(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Layers the optional config file under `TASK_CONSOLE_*` environment variables.
    pub fn load(config_file: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn log_level(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level '{}'", self.log_level))
    }
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_TASK_FILE)
}

fn default_max_description_length() -> usize {
    DEFAULT_MAX_DESCRIPTION_LENGTH
}

fn default_log_level() -> String {
    "warn".to_string()
}
