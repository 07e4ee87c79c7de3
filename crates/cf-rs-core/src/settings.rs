//! Settings for cf-rs.
//!
//! [`Settings`] holds logging configuration and one [`DatabaseSettings`] per
//! connection alias. The database entry selects the SQL dialect and carries
//! the table prefix and table options stamped onto compiled queries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Engine name selecting the SQLite dialect.
pub const SQLITE_ENGINE: &str = "cf_rs.db.backends.sqlite3";

/// Per-database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The database engine (e.g. `cf_rs.db.backends.sqlite3`).
    pub engine: String,
    /// Prefix concatenated in front of every table name.
    pub table_prefix: String,
    /// Free-form directive appended after the column list of `CREATE TABLE`
    /// (e.g. `WITHOUT ROWID`).
    pub table_options: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: SQLITE_ENGINE.to_string(),
            table_prefix: String::new(),
            table_options: None,
        }
    }
}

/// The complete set of cf-rs settings.
///
/// # Examples
///
/// ```
/// use cf_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log level or `EnvFilter` directive (e.g. "info", "cf_rs_db=trace").
    pub log_level: String,
    /// Database configurations, keyed by alias (e.g. "default").
    pub databases: HashMap<String, DatabaseSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut databases = HashMap::new();
        databases.insert("default".to_string(), DatabaseSettings::default());

        Self {
            debug: true,
            log_level: "info".to_string(),
            databases,
        }
    }
}

impl Settings {
    /// Returns the database configuration registered under `alias`.
    pub fn database(&self, alias: &str) -> Option<&DatabaseSettings> {
        self.databases.get(alias)
    }

    /// Returns the `default` database configuration, if present.
    pub fn default_database(&self) -> Option<&DatabaseSettings> {
        self.database("default")
    }
}
