//! Configuration for Placard.
//!
//! Loaded once at start-up from a TOML file (or built-in defaults), then
//! turned into an immutable [`SlotCatalog`] that is passed to the service.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [database]
//! url = "sqlite://placard.db?mode=rwc"
//!
//! [languages]
//! primary = "en"
//! secondary = "gu"
//! default = "en"
//!
//! [[groups]]
//! name = "breaker-names"
//! field_prefix = "BrakerName"
//! base = "D4000"
//! slot_count = 20
//! words_per_slot = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::DeviceAddress;
use crate::error::{Error, Result};
use crate::model::LanguageCode;
use crate::slot::{SlotCatalog, SlotGroup};

/// Environment variable overriding `server.bind`.
pub const ENV_BIND: &str = "PLACARD_BIND";
/// Environment variable overriding `database.url`.
pub const ENV_DATABASE_URL: &str = "PLACARD_DATABASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacardConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Translation store settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Language roles.
    #[serde(default)]
    pub languages: LanguageConfig,

    /// Slot groups, in display order.
    #[serde(default = "default_groups")]
    pub groups: Vec<SlotGroupConfig>,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Translation store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Which language is on the controller and which one the overlay serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Language physically stored on the controller.
    #[serde(default = "default_primary")]
    pub primary: LanguageCode,

    /// Language served from the translation table.
    #[serde(default = "default_secondary")]
    pub secondary: LanguageCode,

    /// Language used when a request names none.
    #[serde(default = "default_primary")]
    pub default: LanguageCode,

    /// Longest secondary text accepted from users.
    #[serde(default = "default_max_secondary_chars")]
    pub max_secondary_chars: usize,
}

/// One slot group as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGroupConfig {
    /// Group name used in requests.
    pub name: String,
    /// Field name prefix; slot `i` is `{field_prefix}{i}`.
    pub field_prefix: String,
    /// Address of slot 1.
    pub base: DeviceAddress,
    /// Number of slots.
    pub slot_count: usize,
    /// Words per slot (two characters each).
    #[serde(default = "default_words_per_slot")]
    pub words_per_slot: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://placard.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_primary() -> LanguageCode {
    LanguageCode::from_normalized("en")
}

fn default_secondary() -> LanguageCode {
    LanguageCode::from_normalized("gu")
}

fn default_max_secondary_chars() -> usize {
    50
}

fn default_words_per_slot() -> usize {
    10
}

fn default_groups() -> Vec<SlotGroupConfig> {
    vec![
        SlotGroupConfig {
            name: "breaker-names".to_string(),
            field_prefix: "BrakerName".to_string(),
            base: DeviceAddress::new(crate::address::Device::D, 4000),
            slot_count: 20,
            words_per_slot: default_words_per_slot(),
        },
        SlotGroupConfig {
            name: "breaker-types".to_string(),
            field_prefix: "BreakerTypeName".to_string(),
            base: DeviceAddress::new(crate::address::Device::D, 4410),
            slot_count: 4,
            words_per_slot: default_words_per_slot(),
        },
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            default: default_primary(),
            max_secondary_chars: default_max_secondary_chars(),
        }
    }
}

impl Default for PlacardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            languages: LanguageConfig::default(),
            groups: default_groups(),
        }
    }
}

impl PlacardConfig {
    /// Loads configuration from `path`, or the defaults when `path` is `None`,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("Failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&content)
                    .map_err(|e| Error::config(format!("{}: {e}", path.display())))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Applies single-key overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = url;
        }
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let langs = &self.languages;
        if langs.primary == langs.secondary {
            return Err(Error::config(format!(
                "primary and secondary language are both '{}'",
                langs.primary
            )));
        }
        if langs.max_secondary_chars == 0 {
            return Err(Error::config("languages.max_secondary_chars must be positive"));
        }
        self.catalog().map(|_| ())
    }

    /// Builds the immutable slot catalog.
    pub fn catalog(&self) -> Result<SlotCatalog> {
        let groups = self
            .groups
            .iter()
            .map(|g| {
                SlotGroup::new(
                    g.name.clone(),
                    g.field_prefix.clone(),
                    g.base,
                    g.slot_count,
                    g.words_per_slot,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        SlotCatalog::new(groups)
    }
}
