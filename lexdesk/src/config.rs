use anyhow::{Context, Result};
use serde::Deserialize;
use serde_with::serde_as;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const ENV_PREFIX: &str = "LEXDESK";

const DEFAULT_CONFIG: &str = r#"[api]
base_url = "http://localhost:8000"
# Value of the Django `sessionid` cookie of a logged-in user
# session_id = ""
# Used as-is when set, otherwise scraped from `csrf_page`
# csrf_token = ""
csrf_page = "/"

[search]
quiet_period_ms = 500

[tracking]
tick_interval_ms = 1000
"#;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub tracking: TrackingSettings,
}

#[derive(Deserialize, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
    pub csrf_page: String,
}

// Credentials stay out of logs.
impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("session_id", &self.session_id.as_ref().map(|_| "<redacted>"))
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "<redacted>"))
            .field("csrf_page", &self.csrf_page)
            .finish()
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub quiet_period_ms: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct TrackingSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub tick_interval_ms: u64,
}

impl SearchSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

impl TrackingSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://localhost:8000".to_string(),
                session_id: None,
                csrf_token: None,
                csrf_page: "/".to_string(),
            },
            search: SearchSettings {
                quiet_period_ms: 500,
            },
            tracking: TrackingSettings {
                tick_interval_ms: 1000,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("lexdesk")
        .join("config.toml"))
}

/// Defaults, then the user's config file if it exists, then `LEXDESK_*`
/// environment variables (`LEXDESK_API__BASE_URL`, ...).
pub fn read_config() -> Result<Settings> {
    let path = config_path()?;
    read_config_from(&path)
}

pub fn read_config_from(path: &Path) -> Result<Settings> {
    build(
        path,
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
    .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn build(path: &Path, environment: config::Environment) -> Result<Settings, config::ConfigError> {
    let defaults = Settings::default();

    let settings = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .set_default("api.csrf_page", defaults.api.csrf_page)?
        .set_default("search.quiet_period_ms", defaults.search.quiet_period_ms)?
        .set_default("tracking.tick_interval_ms", defaults.tracking.tick_interval_ms)?
        .add_source(config::File::from(path).required(false))
        .add_source(environment)
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// Create the config file with commented defaults unless it exists.
/// Returns `true` when a file was written.
pub fn write_default_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(true)
}
