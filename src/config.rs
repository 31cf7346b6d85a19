use anyhow::Context;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Environment variable consulted when `[catalog] api_key` is absent.
pub const API_KEY_ENV: &str = "RAPIDAPI_KEY";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

/// Which transport the catalog client talks through.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Authenticated RapidAPI host, needs an API key.
    Rapidapi,
    /// Public relay wrapping the open Deezer endpoint, no key.
    Relay,
}

#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    pub strategy: Strategy,
    /// Only meaningful for the rapidapi strategy. Never hardcode this;
    /// the `RAPIDAPI_KEY` environment variable works as a fallback.
    pub api_key: Option<String>,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Explicit config value wins over the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.clone(), std::env::var(API_KEY_ENV).ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn resolve_api_key(explicit: Option<String>, from_env: Option<String>) -> Option<String> {
    explicit.or(from_env)
}

fn default_limit() -> u32 {
    20
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct FavoritesConfig {
    pub path: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("favorites.json"),
        }
    }
}
