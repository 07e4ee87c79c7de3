//! Settings loading from configuration files and the environment.
//!
//! File content is deep-merged over [`Settings::default`], so a file only
//! needs the keys it changes. Environment variables are applied last and
//! always target the `default` database alias.
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CF_DEBUG` | `debug` |
//! | `CF_LOG_LEVEL` | `log_level` |
//! | `CF_DB_ENGINE` | `databases.default.engine` |
//! | `CF_TABLE_PREFIX` | `databases.default.table_prefix` |
//!
//! ```rust,no_run
//! use cf_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/cf.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::CfError;
use crate::settings::{DatabaseSettings, Settings};

const DEFAULT_ALIAS: &str = "default";

/// Loads settings from a TOML string.
///
/// # Errors
///
/// Returns [`CfError::ConfigurationError`] if the TOML is malformed or does
/// not describe valid settings.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, CfError> {
    let overlay: serde_json::Value = toml::from_str(toml_str)
        .map_err(|e| CfError::ConfigurationError(format!("Invalid TOML settings: {e}")))?;
    overlay_defaults(overlay, "TOML")
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns [`CfError::ConfigurationError`] if the JSON is malformed or does
/// not describe valid settings.
pub fn from_json_str(json_str: &str) -> Result<Settings, CfError> {
    let overlay: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| CfError::ConfigurationError(format!("Invalid JSON settings: {e}")))?;
    overlay_defaults(overlay, "JSON")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`CfError::IoError`] if the file cannot be read.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, CfError> {
    from_toml_str(&read_config(path.as_ref())?)
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, CfError> {
    from_json_str(&read_config(path.as_ref())?)
}

/// Loads settings from a `.toml` or `.json` file, chosen by extension.
///
/// # Errors
///
/// Returns [`CfError::ConfigurationError`] for any other extension or
/// invalid content, and [`CfError::IoError`] for an unreadable file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, CfError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => from_toml_file(path),
        Some("json") => from_json_file(path),
        _ => Err(CfError::ConfigurationError(format!(
            "Unsupported settings file '{}': expected .toml or .json",
            path.display()
        ))),
    }
}

/// Loads settings from a TOML file, then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CfError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Builds settings from the defaults and the environment alone.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `CF_*` environment overrides.
///
/// Database overrides create the `default` alias if it is missing.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(flag) = env_override("CF_DEBUG") {
        settings.debug = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }
    if let Some(level) = env_override("CF_LOG_LEVEL") {
        settings.log_level = level;
    }
    if let Some(engine) = env_override("CF_DB_ENGINE") {
        default_database_mut(settings).engine = engine;
    }
    if let Some(prefix) = env_override("CF_TABLE_PREFIX") {
        default_database_mut(settings).table_prefix = prefix;
    }
}

fn env_override(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    tracing::debug!(variable = name, "applying settings override from environment");
    Some(value)
}

fn default_database_mut(settings: &mut Settings) -> &mut DatabaseSettings {
    settings
        .databases
        .entry(DEFAULT_ALIAS.to_string())
        .or_default()
}

fn read_config(path: &Path) -> Result<String, CfError> {
    tracing::debug!(path = %path.display(), "reading settings file");
    Ok(std::fs::read_to_string(path)?)
}

fn overlay_defaults(overlay: serde_json::Value, format: &str) -> Result<Settings, CfError> {
    let mut merged = serde_json::to_value(Settings::default())
        .map_err(|e| CfError::ConfigurationError(format!("Cannot encode default settings: {e}")))?;
    deep_merge(&mut merged, overlay);
    serde_json::from_value(merged).map_err(|e| {
        CfError::ConfigurationError(format!("{format} settings do not match the schema: {e}"))
    })
}

/// Merges `overlay` into `base`; objects merge key by key, anything else
/// replaces the base value.
fn deep_merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::settings::SQLITE_ENGINE;

    // ── Strings ─────────────────────────────────────────────────────

    #[test]
    fn test_toml_overrides_top_level_keys() {
        let settings = from_toml_str(
            r#"
            debug = false
            log_level = "cf_rs_db=trace"
            "#,
        )
        .unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "cf_rs_db=trace");
        assert_eq!(settings.default_database().unwrap().engine, SQLITE_ENGINE);
    }

    #[test]
    fn test_toml_partial_database_keeps_engine() {
        let settings = from_toml_str(
            r#"
            [databases.default]
            table_prefix = "cf_"
            table_options = "WITHOUT ROWID"
            "#,
        )
        .unwrap();
        let db = settings.default_database().unwrap();
        assert_eq!(db.table_prefix, "cf_");
        assert_eq!(db.table_options.as_deref(), Some("WITHOUT ROWID"));
        assert_eq!(db.engine, SQLITE_ENGINE);
    }

    #[test]
    fn test_toml_second_alias() {
        let settings = from_toml_str(
            r#"
            [databases.archive]
            engine = "sqlite"
            table_prefix = "old_"
            "#,
        )
        .unwrap();
        assert_eq!(settings.databases.len(), 2);
        assert_eq!(settings.database("archive").unwrap().table_prefix, "old_");
    }

    #[test]
    fn test_empty_documents_give_defaults() {
        let from_toml = from_toml_str("").unwrap();
        assert!(from_toml.debug);
        assert_eq!(from_toml.log_level, "info");

        let from_json = from_json_str("{}").unwrap();
        assert!(from_json.debug);
        assert_eq!(from_json.databases.len(), 1);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            from_toml_str("[[broken"),
            Err(CfError::ConfigurationError(_))
        ));
        assert!(matches!(
            from_toml_str("debug = \"sometimes\""),
            Err(CfError::ConfigurationError(_))
        ));
        assert!(matches!(
            from_json_str("{not json"),
            Err(CfError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_json_database_override() {
        let settings = from_json_str(
            r#"{"debug": false, "databases": {"default": {"table_prefix": "app_"}}}"#,
        )
        .unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.default_database().unwrap().table_prefix, "app_");
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "log_level = \"warn\"").unwrap();
        assert_eq!(from_file(toml_file.path()).unwrap().log_level, "warn");

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json_file, "{{\"log_level\": \"error\"}}").unwrap();
        assert_eq!(from_file(json_file.path()).unwrap().log_level, "error");

        let yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            from_file(yaml_file.path()),
            Err(CfError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = from_toml_file("/definitely/not/here/cf.toml");
        assert!(matches!(
            result,
            Err(CfError::IoError(ref e)) if e.kind() == std::io::ErrorKind::NotFound
        ));

        let result = from_file("/definitely/not/here/cf.json");
        assert!(matches!(result, Err(CfError::IoError(_))));
    }

    // ── Environment ─────────────────────────────────────────────────

    #[test]
    fn test_env_table_prefix() {
        let mut settings = Settings::default();
        std::env::set_var("CF_TABLE_PREFIX", "env_");
        apply_env_overrides(&mut settings);
        std::env::remove_var("CF_TABLE_PREFIX");
        assert_eq!(settings.default_database().unwrap().table_prefix, "env_");
    }

    #[test]
    fn test_env_engine_creates_default_alias() {
        let mut settings = Settings::default();
        settings.databases.clear();
        std::env::set_var("CF_DB_ENGINE", "sqlite");
        apply_env_overrides(&mut settings);
        std::env::remove_var("CF_DB_ENGINE");
        assert_eq!(settings.default_database().unwrap().engine, "sqlite");
    }

    #[test]
    fn test_env_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();

        std::env::set_var("CF_LOG_LEVEL", "debug");
        let settings = from_toml_file_with_env(file.path()).unwrap();
        std::env::remove_var("CF_LOG_LEVEL");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_deep_merge_replaces_scalars_and_merges_objects() {
        let mut base = serde_json::json!({"a": 1, "nested": {"x": 1, "y": 2}});
        deep_merge(&mut base, serde_json::json!({"a": 5, "nested": {"y": 3, "z": 4}}));
        assert_eq!(
            base,
            serde_json::json!({"a": 5, "nested": {"x": 1, "y": 3, "z": 4}})
        );
    }
}
