//! Handler functions for `katalog config` subcommands.
//!
//! Also provides TOML dotted-key helpers used by `config get`.

use std::path::PathBuf;

use katalog_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::{KatalogConfig, PROJECT_NAME};

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Init { file, force } => {
            let path = match file.as_deref() {
                Some(file) => PathBuf::from(file),
                None => KatalogConfig::resolve_config_path(config_path)
                    .ok_or_else(|| Error::config("Could not determine config directory"))?,
            };
            cmd_config_init(&path, force)
        }
        ConfigAction::Check => cmd_config_check(config_path),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match KatalogConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; run `{PROJECT_NAME} config init` to create it)");
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Print a configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    let config = KatalogConfig::load(config_path)?;
    println!("{}", config_value(&config, key)?);
    Ok(())
}

/// Look up a configuration value by dotted key, formatted for display.
///
/// # Errors
///
/// A configuration error if the key does not exist.
pub fn config_value(config: &KatalogConfig, key: &str) -> Result<String> {
    let value = toml::Value::try_from(config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Write a default configuration file.
pub fn cmd_config_init(path: &std::path::Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = KatalogConfig::default().to_toml_string()?;
    std::fs::write(path, &toml_str).map_err(|e| Error::io_with_path(e, path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

/// Load the configuration and run startup validation.
pub fn cmd_config_check(config_path: Option<&str>) -> Result<()> {
    let config = KatalogConfig::load(config_path)?;
    config.validate()?;

    let search = config.search_config()?;
    let brands = config.brand_table()?;
    println!(
        "OK: {} facets, {} search fields, {} sorts, {} brands (default '{}')",
        search.facets().len(),
        search.search_fields().len(),
        search.sort_fields().len(),
        brands.len(),
        brands.default_key()
    );
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    let mut current = value;
    for part in key.split('.') {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_default(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, KatalogConfig::default().to_toml_string().unwrap()).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // cmd_config_path
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    // ------------------------------------------------------------------------
    // config get
    // ------------------------------------------------------------------------

    #[test]
    fn test_config_value_nested_keys() {
        let config = KatalogConfig::default();
        assert_eq!(config_value(&config, "search.page_size").unwrap(), "10");
        assert_eq!(config_value(&config, "search.advanced.query_parser").unwrap(), "dismax");
        assert_eq!(config_value(&config, "brands.default").unwrap(), "neos");
        assert_eq!(config_value(&config, "record.subject").unwrap(), "subject_t");
        assert_eq!(config_value(&config, "server.unknown_brand").unwrap(), "reject");
    }

    #[test]
    fn test_config_value_table() {
        let rendered = config_value(&KatalogConfig::default(), "brands.libraries.neos").unwrap();
        assert!(rendered.contains("neosurl"));
    }

    #[test]
    fn test_cmd_config_get_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        assert!(cmd_config_get(Some(path.to_str().unwrap()), "search.autocomplete_path").is_ok());
    }

    #[test]
    fn test_cmd_config_get_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let err = cmd_config_get(Some(path.to_str().unwrap()), "nonexistent.key").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    // ------------------------------------------------------------------------
    // config init
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("katalog").join("config.toml");

        cmd_config_init(&path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[search]"));
        assert!(content.contains("[brands.libraries.neos]"));
    }

    #[test]
    fn test_cmd_config_init_no_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();

        let err = cmd_config_init(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn test_cmd_config_init_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "old content").unwrap();

        cmd_config_init(&path, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("page_size"));
    }

    #[test]
    fn test_handle_init_with_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        handle_config_command(
            None,
            ConfigAction::Init {
                file: Some(path.to_str().unwrap().to_string()),
                force: false,
            },
        )
        .unwrap();
        assert!(path.exists());
    }

    // ------------------------------------------------------------------------
    // config check
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_check_default_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        assert!(cmd_config_check(Some(path.to_str().unwrap())).is_ok());
    }

    #[test]
    fn test_cmd_config_check_rejects_missing_default_brand() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[brands]\ndefault = \"central\"\n").unwrap();

        let err = cmd_config_check(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.is_configuration());
    }

    // ------------------------------------------------------------------------
    // TOML helpers
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[search]\npage_size = 10").unwrap();
        assert_eq!(
            get_nested_value(&val, "search.page_size"),
            Some(&toml::Value::Integer(10))
        );
        assert!(get_nested_value(&val, "search.nonexistent").is_none());
        assert!(get_nested_value(&val, "search.page_size.deeper").is_none());
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("suggest".into())), "suggest");
        assert_eq!(format_toml_value(&toml::Value::Integer(5)), "5");
        assert_eq!(format_toml_value(&toml::Value::Boolean(true)), "true");
    }
}
