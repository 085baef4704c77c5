//! tmxkit configuration
//!
//! Loads decoder settings from a `key = value` options file:
//!
//! ```text
//! # tmxkit.txt
//! tileset_order = sorted
//! parallel_layers = true
//! log_filter = tmxkit=debug
//! ```

use std::fs;
use std::path::Path;
use tmxkit_core::TilesetOrder;

/// Default location of the options file
pub const DEFAULT_CONFIG_PATH: &str = "tmxkit.txt";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Tileset ordering applied before GID resolution (from "tileset_order")
    pub tileset_order: TilesetOrder,
    /// Decode layers in parallel (from "parallel_layers")
    pub parallel_layers: bool,
    /// Tracing filter directive (from "log_filter")
    pub log_filter: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            tileset_order: TilesetOrder::Document,
            parallel_layers: false,
            log_filter: "info".into(),
        }
    }
}

impl DecoderConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Load `tmxkit.txt` from the working directory, falling back to defaults
    pub fn load_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("No {} loaded ({}), using defaults", DEFAULT_CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    /// Parse options file content
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                config.parse_option(key.trim(), value.trim());
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "tileset_order" => match TilesetOrder::from_name(value) {
                Some(order) => self.tileset_order = order,
                None => tracing::warn!("Invalid tileset_order '{}', keeping {:?}", value, self.tileset_order),
            },
            "parallel_layers" => match value.parse() {
                Ok(parallel) => self.parallel_layers = parallel,
                Err(_) => tracing::warn!("Invalid parallel_layers '{}', keeping {}", value, self.parallel_layers),
            },
            "log_filter" => self.log_filter = value.into(),
            _ => {
                tracing::debug!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    /// Log the configuration summary
    pub fn display(&self) {
        tracing::info!("Decoder configuration:");
        tracing::info!("  Tileset order: {:?}", self.tileset_order);
        tracing::info!("  Parallel layers: {}", self.parallel_layers);
        tracing::info!("  Log filter: {}", self.log_filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.tileset_order, TilesetOrder::Document);
        assert!(!config.parallel_layers);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# decoder options
tileset_order = sorted
parallel_layers = true
log_filter = tmxkit=trace
"#;
        let config = DecoderConfig::parse(config_text);
        assert_eq!(config.tileset_order, TilesetOrder::Sorted);
        assert!(config.parallel_layers);
        assert_eq!(config.log_filter, "tmxkit=trace");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = DecoderConfig::parse("tileset_order = shuffled\nparallel_layers = often\nunknown = 1\n");
        assert_eq!(config, DecoderConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tmxkit.txt");
        fs::write(&path, "parallel_layers=true\n").unwrap();

        let config = DecoderConfig::load_from_file(&path).unwrap();
        assert!(config.parallel_layers);

        let missing = DecoderConfig::load_from_file(dir.path().join("missing.txt"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
