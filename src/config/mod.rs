mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./gallery.toml",
        "~/.config/gallery/config.toml",
        "/etc/gallery/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.pool_size == 0 {
        anyhow::bail!("database.pool_size cannot be 0");
    }

    if config.database.connection_timeout_ms == 0 {
        anyhow::bail!("database.connection_timeout_ms cannot be 0");
    }

    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("database.path cannot be empty");
    }

    let listing = &config.listing;
    if listing.default_limit == 0 {
        anyhow::bail!("listing.default_limit cannot be 0");
    }
    if listing.default_limit > listing.max_limit {
        anyhow::bail!(
            "listing.default_limit ({}) exceeds listing.max_limit ({})",
            listing.default_limit,
            listing.max_limit
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, Path::new("gallery.db"));
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.listing.default_limit, 10);
        assert_eq!(config.listing.max_limit, 100);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_config(
            r#"
            [database]
            path = "/tmp/catalog.db"
            busy_timeout_ms = 250
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.path, Path::new("/tmp/catalog.db"));
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(
            config.database.pool_options().busy_timeout,
            Duration::from_millis(250)
        );
        assert_eq!(config.listing.max_limit, 100);
    }

    #[test]
    fn test_memory_path() {
        let file = write_config("[database]\npath = \":memory:\"\n");
        let config = load_config(file.path()).unwrap();
        assert!(config.database.is_memory());
        assert!(!Config::default().database.is_memory());
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let file = write_config("[database]\npool_size = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("pool_size"));
    }

    #[test]
    fn test_rejects_default_limit_above_max() {
        let file = write_config("[listing]\ndefault_limit = 50\nmax_limit = 20\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let file = write_config("[database\npath = 1");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/gallery.toml")));
        assert!(result.is_err());
    }
}
