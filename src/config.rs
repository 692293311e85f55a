use crate::checkin::DEFAULT_GENERATION_TIMEOUT;
use crate::errors::ConfigError;
use crate::storage::DEFAULT_DATA_PATH;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub generator: Option<GeneratorConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let data_path = var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let generator = match var("OPENAI_API_KEY") {
            Some(api_key) => {
                let timeout = match var("VERA_LLM_TIMEOUT_SECS") {
                    Some(value) => value
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .map(Duration::from_secs)
                        .ok_or(ConfigError::Invalid {
                            name: "VERA_LLM_TIMEOUT_SECS",
                            expected: "a positive number of seconds",
                            value,
                        })?,
                    None => DEFAULT_GENERATION_TIMEOUT,
                };
                Some(GeneratorConfig {
                    base_url: var("VERA_LLM_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                    api_key: api_key.trim().to_string(),
                    model: var("VERA_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                    timeout,
                })
            }
            None => None,
        };

        Ok(Self {
            port,
            data_path,
            generator,
        })
    }
}
