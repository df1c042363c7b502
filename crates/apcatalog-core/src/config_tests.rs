//! Tests for config module

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::io::Write;

    // ========================================================================
    // Default tests
    // ========================================================================

    #[test]
    fn test_config_default_values() {
        // Arrange & Act
        let config = CatalogConfig::default();

        // Assert
        assert_eq!(config.data.dataset_path, "data/machines.json");
        assert_eq!(config.table.default_per_page, 25);
        assert_eq!(config.table.page_sizes, vec![10, 25, 50, 100]);
        assert!(config.preferences.enabled);
        assert!(config.preferences.file.is_empty());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.repl.format, "table");
    }

    #[test]
    fn test_preferences_file_override() {
        // Arrange
        let mut config = CatalogConfig::default();
        config.preferences.file = "/tmp/prefs.json".to_string();

        // Act
        let path = config.preferences.resolved_file();

        // Assert
        assert_eq!(path, std::path::PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn test_preferences_file_default_location() {
        let path = PreferencesConfig::default().resolved_file();
        assert!(path.ends_with("apcatalog/preferences.json"));
    }

    // ========================================================================
    // TOML parsing tests
    // ========================================================================

    #[test]
    fn test_config_from_toml_minimal() {
        // Arrange
        let toml = r#"
[data]
dataset_path = "public/data/machines.json"
"#;

        // Act
        let config = CatalogConfig::from_toml(toml).expect("parse");

        // Assert
        assert_eq!(config.data.dataset_path, "public/data/machines.json");
        assert_eq!(config.table.default_per_page, 25);
    }

    #[test]
    fn test_config_from_toml_full() {
        // Arrange
        let toml = r#"
[data]
dataset_path = "/srv/catalog/machines.json"

[table]
default_per_page = 50
page_sizes = [20, 50]

[preferences]
enabled = false
file = "/var/lib/apcatalog/prefs.json"

[logging]
level = "debug"
format = "compact"

[repl]
timing = true
format = "json"
"#;

        // Act
        let config = CatalogConfig::from_toml(toml).expect("parse");

        // Assert
        assert_eq!(config.data.dataset_path, "/srv/catalog/machines.json");
        assert_eq!(config.table.default_per_page, 50);
        assert_eq!(config.table.page_sizes, vec![20, 50]);
        assert!(!config.preferences.enabled);
        assert_eq!(config.preferences.file, "/var/lib/apcatalog/prefs.json");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert!(config.repl.timing);
        assert_eq!(config.repl.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml_wrong_type() {
        let toml = r#"
[table]
default_per_page = "many"
"#;

        let result = CatalogConfig::from_toml(toml);

        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path_reads_file() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[table]\ndefault_per_page = 10").expect("write");

        // Act
        let config = CatalogConfig::load_from_path(file.path()).expect("load");

        // Assert
        assert_eq!(config.table.default_per_page, 10);
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");

        let config = CatalogConfig::load_from_path(dir.path().join("absent.toml")).expect("load");

        assert_eq!(config.table.default_per_page, 25);
    }

    // ========================================================================
    // Validation tests
    // ========================================================================

    #[test]
    fn test_config_validate_success() {
        assert!(CatalogConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validate_default_per_page_not_allowed() {
        // Arrange
        let mut config = CatalogConfig::default();
        config.table.default_per_page = 30;

        // Act
        let result = config.validate();

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("table.default_per_page"));
    }

    #[test]
    fn test_config_validate_zero_page_size() {
        let mut config = CatalogConfig::default();
        config.table.page_sizes = vec![0, 25];

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("table.page_sizes"));
    }

    #[test]
    fn test_config_validate_empty_dataset_path() {
        let mut config = CatalogConfig::default();
        config.data.dataset_path = "  ".to_string();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("data.dataset_path"));
    }

    #[test]
    fn test_config_validate_invalid_log_level() {
        let mut config = CatalogConfig::default();
        config.logging.level = "verbose".to_string();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_config_validate_invalid_log_format() {
        let mut config = CatalogConfig::default();
        config.logging.format = "json".to_string();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_config_validate_invalid_repl_format() {
        let mut config = CatalogConfig::default();
        config.repl.format = "yaml".to_string();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("repl.format"));
    }

    // ========================================================================
    // Serialization tests
    // ========================================================================

    #[test]
    fn test_config_roundtrip() {
        // Arrange
        let mut config = CatalogConfig::default();
        config.table.default_per_page = 100;
        config.preferences.enabled = false;

        // Act
        let toml_str = config.to_toml().expect("serialize");
        let parsed = CatalogConfig::from_toml(&toml_str).expect("parse");

        // Assert
        assert!(toml_str.contains("[table]"));
        assert_eq!(parsed.table.default_per_page, 100);
        assert!(!parsed.preferences.enabled);
    }
}
