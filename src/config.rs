// Configuration loading.
// Reads the JSON config, applies environment overrides and seeds a default file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HubError, Result};
use crate::paths;
use crate::state::{BackToTop, MenuEntry, RoleLabel};

pub const CONFIG_ENV: &str = "HUBNAV_CONFIG";
pub const ORIGIN_ENV: &str = "HUBNAV_ORIGIN";
pub const SESSION_ENV: &str = "HUBNAV_SESSION";

/// One secondary menu entry and the panel it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub body: String,
}

impl MenuConfig {
    fn new(id: &str, label: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme, host and port of the hub.
    pub origin: String,
    /// Session id sent as the `sessionid` cookie. Never written to disk.
    #[serde(skip_serializing)]
    pub session: Option<String>,
    pub fetch_timeout_ms: u64,
    /// Scroll offset past which the back-to-top button appears.
    pub scroll_threshold: u32,
    pub role_label: RoleLabel,
    pub languages: Vec<String>,
    /// Language the page is currently rendered in.
    pub language: String,
    /// Address bar path when the page loads.
    pub start_path: String,
    pub menu: Vec<MenuConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
            session: None,
            fetch_timeout_ms: 10_000,
            scroll_threshold: BackToTop::DEFAULT_THRESHOLD,
            role_label: RoleLabel::default(),
            languages: vec!["en".to_string(), "de".to_string()],
            language: "en".to_string(),
            start_path: "/control/venues/overview/".to_string(),
            menu: vec![
                MenuConfig::new("overview", "Overview", "Venues you manage at a glance."),
                MenuConfig::new("events", "Events", "Upcoming events and bookings."),
                MenuConfig::new("contracts", "Contracts", "Open and settled contracts."),
                MenuConfig::new("settings", "Settings", "Venue details and procedures."),
            ],
        }
    }
}

impl Config {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, writing the defaults first if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "writing default config");
            Config::default().save(path)?;
        }
        Self::load(path)
    }

    /// Resolve the config path, load it and apply environment overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(paths::config_path)
            .ok_or_else(|| HubError::Config("no home directory for config".to_string()))?;
        let mut config = Self::load_or_init(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from environment-style variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(origin) = lookup(ORIGIN_ENV).filter(|v| !v.is_empty()) {
            self.origin = origin;
        }
        if let Some(session) = lookup(SESSION_ENV).filter(|v| !v.is_empty()) {
            self.session = Some(session);
        }
    }

    /// Write the config as pretty JSON, atomically via a temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.menu.is_empty() {
            return Err(HubError::Config("menu must have at least one entry".to_string()));
        }
        for entry in &self.menu {
            if entry.id.is_empty() || !entry.id.chars().all(is_url_safe) {
                return Err(HubError::Config(format!(
                    "menu id {:?} is not URL-safe",
                    entry.id
                )));
            }
        }
        if self.fetch_timeout_ms == 0 {
            return Err(HubError::Config("fetch_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        self.menu
            .iter()
            .map(|entry| MenuEntry::new(entry.id.clone(), entry.label.clone()))
            .collect()
    }
}

fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')
}
