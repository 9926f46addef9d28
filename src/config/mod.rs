use crate::global;
use crate::summarize::default_sections;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const FIREFLIES_API_KEY: &str = "FIREFLIES_API_KEY";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const GOOGLE_SCRIPT_URL: &str = "GOOGLE_SCRIPT_URL";
pub const PORT: &str = "PORT";
pub const HOST: &str = "HOST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fireflies: FirefliesConfig,
    pub anthropic: AnthropicConfig,
    pub publish: PublishConfig,
    pub summary: SummaryConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirefliesConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    /// How many recordings `list` shows when no limit is given
    pub list_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Document-append endpoint (e.g. a Google Apps Script web app).
    /// Publishing is skipped when unset.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Sections requested in addition to the four fixed ones
    pub extra_sections: Vec<String>,
}

impl SummaryConfig {
    /// Fixed sections followed by the non-blank extras.
    pub fn sections(&self) -> Vec<String> {
        let mut sections = default_sections();
        sections.extend(
            self.extra_sections
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
        sections
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for FirefliesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.fireflies.ai/graphql".to_string(),
            list_limit: 10,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2000,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Load the config file (writing defaults if it is missing), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = global::config_file()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(config_path) {
                warn!("Could not write default config: {:#}", e);
            }
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config.normalized())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Override file values with environment variables. `lookup` is
    /// `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| non_empty(lookup(name));

        if let Some(key) = lookup(FIREFLIES_API_KEY) {
            self.fireflies.api_key = Some(key);
        }
        if let Some(key) = lookup(ANTHROPIC_API_KEY) {
            self.anthropic.api_key = Some(key);
        }
        if let Some(url) = lookup(GOOGLE_SCRIPT_URL) {
            self.publish.endpoint = Some(url);
        }
        if let Some(host) = lookup(HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {} value: {}", PORT, port),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            fireflies_configured: self.fireflies.api_key.is_some(),
            anthropic_configured: self.anthropic.api_key.is_some(),
            publish_configured: self.publish.endpoint.is_some(),
        }
    }

    fn normalized(mut self) -> Self {
        self.fireflies.api_key = non_empty(self.fireflies.api_key);
        self.anthropic.api_key = non_empty(self.anthropic.api_key);
        self.publish.endpoint = non_empty(self.publish.endpoint);
        self
    }
}

/// Which integrations have credentials or endpoints configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub fireflies_configured: bool,
    pub anthropic_configured: bool,
    pub publish_configured: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fireflies.api_url, "https://api.fireflies.ai/graphql");
        assert_eq!(config.anthropic.max_tokens, 2000);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.publish.endpoint.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let content = r#"
            [anthropic]
            model = "claude-3-5-haiku-latest"

            [publish]
            endpoint = ""
        "#;
        let config: Config = toml::from_str(content).unwrap();
        let config = config.normalized();

        assert_eq!(config.anthropic.model, "claude-3-5-haiku-latest");
        assert_eq!(config.anthropic.api_url, "https://api.anthropic.com/v1");
        assert!(config.publish.endpoint.is_none());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (FIREFLIES_API_KEY, "ff-key"),
            (ANTHROPIC_API_KEY, "  "),
            (GOOGLE_SCRIPT_URL, "https://script.google.com/macros/s/abc/exec"),
            (PORT, "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.anthropic.api_key = Some("file-key".to_string());
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.fireflies.api_key.as_deref(), Some("ff-key"));
        assert_eq!(config.anthropic.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.status(),
            ConfigStatus {
                fireflies_configured: true,
                anthropic_configured: true,
                publish_configured: true,
            }
        );
    }

    #[test]
    fn test_extra_sections_follow_fixed_ones() {
        let content = r#"
            [summary]
            extra_sections = ["Decisions", "  ", "Risks"]
        "#;
        let config: Config = toml::from_str(content).unwrap();

        let sections = config.summary.sections();
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[..4], default_sections()[..]);
        assert_eq!(sections[4..], ["Decisions", "Risks"]);
        assert_eq!(Config::default().summary.sections(), default_sections());
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|name| (name == PORT).then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_from_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.anthropic.model, config.anthropic.model);
    }
}
