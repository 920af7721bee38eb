//! System settings key/value store

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::config::SystemSettings;
use crate::error::Result;

impl Database {
    /// Get a raw setting value
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM system_settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Validate and store a setting, replacing any previous value
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        SystemSettings::validate_value(key, value)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO system_settings (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// All stored settings as a typed struct, with defaults for missing keys
    pub fn system_settings(&self) -> Result<SystemSettings> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM system_settings ORDER BY key")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(SystemSettings::from_pairs(pairs))
    }
}
