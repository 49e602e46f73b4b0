use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::catalog::Catalog;
use std::path::Path;

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10;

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) api_base_url: Option<String>,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) subdomain: Option<String>,
    #[serde(default)]
    pub(crate) domain: Option<String>,
    #[serde(default = "default_refresh_interval")]
    pub(crate) refresh_interval_secs: u64,
    #[serde(default)]
    pub(crate) catalog_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            token: None,
            subdomain: None,
            domain: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            catalog_path: None,
        }
    }
}

impl Config {
    /// File, then environment (after loading `env_file`), in increasing priority.
    pub(crate) fn load(config_path: Option<&str>, env_file: &str) -> Result<Self> {
        dotenv::from_filename(env_file).ok();

        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub(crate) fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let strings = [
            ("STOREFRONT_API_URL", &mut self.api_base_url),
            ("STOREFRONT_TOKEN", &mut self.token),
            ("STOREFRONT_SUBDOMAIN", &mut self.subdomain),
            ("STOREFRONT_DOMAIN", &mut self.domain),
            ("STOREFRONT_CATALOG", &mut self.catalog_path),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = Some(value);
            }
        }

        if let Some(interval) = lookup("STOREFRONT_REFRESH_INTERVAL") {
            self.refresh_interval_secs = interval
                .parse()
                .with_context(|| format!("Invalid STOREFRONT_REFRESH_INTERVAL: {interval}"))?;
        }
        Ok(())
    }

    pub(crate) fn with_api_base_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.api_base_url = url;
        }
        self
    }

    pub(crate) fn with_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.token = token;
        }
        self
    }

    pub(crate) fn with_subdomain(mut self, subdomain: Option<String>) -> Self {
        if subdomain.is_some() {
            self.subdomain = subdomain;
        }
        self
    }

    pub(crate) fn get_api_base_url(&self) -> Result<&str> {
        self.api_base_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "API URL not configured. Set STOREFRONT_API_URL environment variable or use --api-url"
            )
        })
    }

    pub(crate) fn get_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "API token not configured. Set STOREFRONT_TOKEN environment variable or use --token"
            )
        })
    }

    /// Operator catalog if one is configured, the built-in one otherwise.
    pub(crate) fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::default()),
        }
    }
}
