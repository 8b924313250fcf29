//! Configuration file handling
//!
//! Screens and their relation extractors are declared in TOML:
//!
//! ```toml
//! [backend]
//! fixtures_dir = "fixtures"
//!
//! [[screens]]
//! name = "reservations"
//! primary = "reservations"
//!
//! [[screens.relations]]
//! field = "facility"
//! kind = "facilities"
//! foreign_key = "facility_id"
//! ```

use anyhow::{Context, Result};
use cg_core::EntityKind;
use hydrate::{HydrateError, RelationPlan, RelationSpec};
use serde::{Deserialize, Serialize};
use session::page::DEFAULT_PAGE_SIZE;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "concierge.toml";

/// Largest page size a screen may request
pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("screen name must not be empty")]
    EmptyScreenName,

    #[error("duplicate screen '{0}'")]
    DuplicateScreen(String),

    #[error("screen '{screen}': page_size {size} is out of range (1-{max})", max = MAX_PAGE_SIZE)]
    PageSize { screen: String, size: u32 },

    #[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    UnknownLevel(String),

    #[error("screen '{screen}': invalid relations")]
    Relations {
        screen: String,
        #[source]
        error: HydrateError,
    },

    #[error("unknown screen '{0}'")]
    UnknownScreen(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub screens: Vec<ScreenConfig>,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Where related entities are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Root of the `<kind>/<id>.json` fixture tree, relative to the config file
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
        }
    }
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Write logs to `concierge.log` in this directory instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl LoggingConfig {
    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.level).map_err(|_| ConfigError::UnknownLevel(self.level.clone()))
    }
}

/// One list view and the relations joined onto its records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub name: String,

    /// Kind of the primary records
    ///
    /// Page files supply the records themselves, so this only labels output
    /// (`config list`, the `hydrate` summary).
    pub primary: EntityKind,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub relations: Vec<RelationSpec>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl AppConfig {
    /// Parse configuration text; relative paths resolve against `base_dir`
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(text).context("Failed to parse config")?;

        if config.backend.fixtures_dir.is_relative() {
            config.backend.fixtures_dir = base_dir.join(&config.backend.fixtures_dir);
        }
        if let Some(dir) = config.logging.directory.as_mut() {
            if dir.is_relative() {
                *dir = base_dir.join(&*dir);
            }
        }

        Ok(config)
    }

    /// Look up a screen by name
    pub fn screen(&self, name: &str) -> Result<&ScreenConfig, ConfigError> {
        self.screens
            .iter()
            .find(|screen| screen.name == name)
            .ok_or_else(|| ConfigError::UnknownScreen(name.to_string()))
    }

    /// Check the whole configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.level()?;

        let mut seen = HashSet::new();
        for screen in &self.screens {
            if screen.name.is_empty() {
                return Err(ConfigError::EmptyScreenName);
            }
            if !seen.insert(screen.name.as_str()) {
                return Err(ConfigError::DuplicateScreen(screen.name.clone()));
            }
            if screen.page_size == 0 || screen.page_size > MAX_PAGE_SIZE {
                return Err(ConfigError::PageSize {
                    screen: screen.name.clone(),
                    size: screen.page_size,
                });
            }
            screen.plan()?;
        }

        Ok(())
    }
}

impl ScreenConfig {
    /// Stage plan for this screen's relations
    pub fn plan(&self) -> Result<RelationPlan, ConfigError> {
        RelationPlan::build(&self.relations).map_err(|error| ConfigError::Relations {
            screen: self.name.clone(),
            error,
        })
    }
}

/// Per-user config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("concierge").join("config.toml"))
}

/// Find the config file to use
///
/// An explicit path always wins, then `./concierge.toml`, then the per-user
/// file. Only the explicit path is returned without checking it exists.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    config_file_path().filter(|path| path.is_file())
}

/// Load configuration, falling back to defaults when no file exists
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = locate(explicit) else {
        return Ok(AppConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let base_dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut config = AppConfig::parse(&text, base_dir)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    config.source = Some(path);
    Ok(config)
}

/// Commented sample configuration
pub fn example_config() -> &'static str {
    r#"# Concierge configuration
#
# Lookup order: --config, ./concierge.toml, then the per-user config dir.

[backend]
# Related entities are read from <fixtures_dir>/<kind>/<id>.json.
# Relative paths resolve against this file's directory.
fixtures_dir = "fixtures"

[logging]
# trace, debug, info, warn or error (-v flags override)
level = "warn"
# directory = "logs"

[[screens]]
name = "reservations"
primary = "reservations"
page_size = 20

# reservation.facility_id -> facilities
[[screens.relations]]
field = "facility"
kind = "facilities"
foreign_key = "facility_id"

# reservation.user_id -> users
[[screens.relations]]
field = "user"
kind = "users"
foreign_key = "user_id"

# facility.building_id -> buildings, resolved after "facility"
[[screens.relations]]
field = "building"
kind = "buildings"
foreign_key = "building_id"
through = "facility"
"#
}
