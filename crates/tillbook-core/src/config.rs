//! Configuration
//!
//! Two layers:
//! - [`AppConfig`]: process configuration from a TOML file plus `TILLBOOK_*`
//!   environment overrides (database path, bind address, auth, sessions)
//! - [`SystemSettings`]: shop settings stored as key/value rows in the
//!   database, exposed as a typed struct with an escape hatch for unknown keys

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::money::NumberFormat;
use crate::validate::Validator;

/// Default config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tillbook.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub require_auth: bool,
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub session_ttl_hours: i64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            require_auth: true,
            allowed_origins: vec![],
            static_dir: None,
            session_ttl_hours: 12,
        }
    }
}

/// Process configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerSection,
}

impl AppConfig {
    /// Default config file location (`~/.config/tillbook/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tillbook").join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present, otherwise built-in defaults. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    Error::Config(format!("Cannot read config {}: {}", p.display(), e))
                })?;
                info!(path = %p.display(), "Loaded config file");
                Self::from_toml(&content)?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => {
                    let content = std::fs::read_to_string(&p)?;
                    info!(path = %p.display(), "Loaded config file");
                    Self::from_toml(&content)?
                }
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `TILLBOOK_*` overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = get("TILLBOOK_DB") {
            self.database.path = PathBuf::from(db);
        }
        if let Some(host) = get("TILLBOOK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("TILLBOOK_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid TILLBOOK_PORT: {}", port)))?;
        }
        if let Some(ttl) = get("TILLBOOK_SESSION_TTL_HOURS") {
            self.server.session_ttl_hours = ttl.trim().parse().map_err(|_| {
                Error::Config(format!("Invalid TILLBOOK_SESSION_TTL_HOURS: {}", ttl))
            })?;
        }
        if let Some(origins) = get("TILLBOOK_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if self.server.session_ttl_hours <= 0 {
            return Err(Error::Config(
                "session_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// System settings
// ============================================================================

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_LOGO: &str = "logo";
pub const KEY_SHOP_NAME: &str = "shop_name";
pub const KEY_THOUSANDS_SEPARATOR: &str = "thousands_separator";
pub const KEY_DECIMAL_SEPARATOR: &str = "decimal_separator";

/// Typed view over the `system_settings` key/value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub currency: String,
    /// Path of the uploaded logo, if any
    pub logo: Option<String>,
    pub shop_name: Option<String>,
    pub thousands_separator: char,
    pub decimal_separator: char,
    /// Keys without a typed field
    pub extra: BTreeMap<String, String>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        let fmt = NumberFormat::default();
        Self {
            currency: "Rp".to_string(),
            logo: None,
            shop_name: None,
            thousands_separator: fmt.thousands_separator,
            decimal_separator: fmt.decimal_separator,
            extra: BTreeMap::new(),
        }
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl SystemSettings {
    /// Build from stored rows; malformed values for typed keys fall back to defaults
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                KEY_CURRENCY => settings.currency = value,
                KEY_LOGO => settings.logo = Some(value).filter(|v| !v.is_empty()),
                KEY_SHOP_NAME => settings.shop_name = Some(value).filter(|v| !v.is_empty()),
                KEY_THOUSANDS_SEPARATOR => {
                    if let Some(c) = single_char(&value) {
                        settings.thousands_separator = c;
                    }
                }
                KEY_DECIMAL_SEPARATOR => {
                    if let Some(c) = single_char(&value) {
                        settings.decimal_separator = c;
                    }
                }
                _ => {
                    settings.extra.insert(key, value);
                }
            }
        }
        settings
    }

    pub fn number_format(&self) -> NumberFormat {
        NumberFormat {
            thousands_separator: self.thousands_separator,
            decimal_separator: self.decimal_separator,
        }
    }

    /// Validate a single key/value before it is stored
    pub fn validate_value(key: &str, value: &str) -> Result<()> {
        let mut v = Validator::new();
        v.check(
            !key.trim().is_empty() && key.len() <= 64,
            "key",
            "must be 1-64 characters",
        );
        match key {
            KEY_CURRENCY => {
                v.required("value", value);
            }
            KEY_THOUSANDS_SEPARATOR | KEY_DECIMAL_SEPARATOR => {
                v.check(
                    single_char(value).is_some_and(|c| !c.is_ascii_digit() && c != '-'),
                    "value",
                    "must be a single non-digit character",
                );
            }
            _ => {}
        }
        v.finish()
    }
}
