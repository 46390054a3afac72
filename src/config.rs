use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PROFILE_TOKEN: &str = "Profile_1";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TesterConfig {
    pub port: u16,
    pub timeout_secs: u64,
    /// Token sent with GetStreamUri.
    pub profile_token: String,
    /// Use the first token reported by GetProfiles instead of `profile_token`.
    pub discover_profile: bool,
    pub log_level: String,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout_secs: 10,
            profile_token: DEFAULT_PROFILE_TOKEN.to_string(),
            discover_profile: false,
            log_level: "warn".to_string(),
        }
    }
}

impl TesterConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read configuration file {}", path.as_ref().display()))?;

        let config: TesterConfig = serde_yaml::from_str(&contents)
            .context("Failed to parse YAML configuration")?;

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
