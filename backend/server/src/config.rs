use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use github::GitHubConfig;
use thiserror::Error;
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "GITHUB_STORYBOOK_BOT_PAT";

/// GitHub caps `first` on connections at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found in environment")]
    MissingSecret(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub struct Config {
    pub port: u16,
    pub github_token: String,
    pub graphql_url: String,
    pub repository_owner: String,
    pub repository_name: String,
    pub repository_id: String,
    pub category_id: String,
    pub site_url: String,
    pub client_ip_header: String,
    pub debounce: Duration,
    pub debounce_capacity: u64,
    pub page_size: u32,
    pub github_timeout: Duration,
}

impl Config {
    /// Reads the process environment. The token may also come from `/run/secrets`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| {
            env::var(key).ok().or_else(|| match key {
                TOKEN_KEY => read_secret(key),
                _ => None,
            })
        })
    }

    pub fn from_source<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = var(TOKEN_KEY)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingSecret(TOKEN_KEY))?;

        let defaults = GitHubConfig::storybook(String::new());

        let debounce_ms: u64 = try_load(&var, "DEBOUNCE_MS", "1000")?;
        if debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "DEBOUNCE_MS",
                value: debounce_ms.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        let page_size: u32 = try_load(&var, "DISCUSSIONS_PAGE_SIZE", "100")?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::Invalid {
                key: "DISCUSSIONS_PAGE_SIZE",
                value: page_size.to_string(),
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }

        Ok(Self {
            port: try_load(&var, "RUST_PORT", "1111")?,
            github_token,
            graphql_url: try_load(&var, "GITHUB_GRAPHQL_URL", &defaults.endpoint)?,
            repository_owner: try_load(&var, "GITHUB_REPOSITORY_OWNER", &defaults.owner)?,
            repository_name: try_load(&var, "GITHUB_REPOSITORY_NAME", &defaults.name)?,
            repository_id: try_load(&var, "GITHUB_REPOSITORY_ID", &defaults.repository_id)?,
            category_id: try_load(&var, "GITHUB_CATEGORY_ID", &defaults.category_id)?,
            site_url: try_load(&var, "DOCS_SITE_URL", "https://storybook.js.org")?,
            client_ip_header: try_load(&var, "CLIENT_IP_HEADER", "client-ip")?,
            debounce: Duration::from_millis(debounce_ms),
            debounce_capacity: try_load(&var, "DEBOUNCE_CAPACITY", "100000")?,
            page_size,
            github_timeout: Duration::from_secs(try_load(&var, "GITHUB_TIMEOUT_SECS", "30")?),
        })
    }

    pub fn github(&self) -> GitHubConfig {
        GitHubConfig {
            endpoint: self.graphql_url.clone(),
            token: self.github_token.clone(),
            owner: self.repository_owner.clone(),
            name: self.repository_name.clone(),
            repository_id: self.repository_id.clone(),
            category_id: self.category_id.clone(),
            page_size: self.page_size,
            timeout: self.github_timeout,
        }
    }
}

fn try_load<T, F>(var: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            })
        }
    }
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}
