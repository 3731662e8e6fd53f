use crate::error::{PitstopError, Result};
use crate::map::Basemap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default location of the published datasets
pub const DEFAULT_DATA_URL: &str = "https://raw.githubusercontent.com/Stephen137/formula_one/main/data/";
pub const DEFAULT_GEOJSON_FILE: &str = "f1-circuits.geojson";
pub const DEFAULT_CSV_FILE: &str = "f1_summary.csv";

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "PITSTOP_CONFIG";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the dashboard
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub data_url: ConfigValue<String>,
    pub geojson_file: ConfigValue<String>,
    pub csv_file: ConfigValue<String>,
    pub basemap: ConfigValue<Basemap>,
    pub http_timeout_secs: ConfigValue<Option<u64>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_url: ConfigValue::new(DEFAULT_DATA_URL.to_string(), ConfigSource::Default),
            geojson_file: ConfigValue::new(DEFAULT_GEOJSON_FILE.to_string(), ConfigSource::Default),
            csv_file: ConfigValue::new(DEFAULT_CSV_FILE.to_string(), ConfigSource::Default),
            basemap: ConfigValue::new(Basemap::default(), ConfigSource::Default),
            http_timeout_secs: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Defaults, then the config file (explicit path or `PITSTOP_CONFIG`), then the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::with_defaults();

        let env_path = env::var(CONFIG_PATH_ENV).ok();
        if let Some(path) = config_path.or(env_path.as_deref().map(Path::new)) {
            config = config.load_from_file(path)?;
        }

        let config = config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot form a dataset location
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("data_url", &self.data_url.value),
            ("geojson_file", &self.geojson_file.value),
            ("csv_file", &self.csv_file.value),
        ] {
            if value.trim().is_empty() {
                return Err(PitstopError::ConfigMissing { key: key.to_string() });
            }
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PitstopError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| PitstopError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(data_url) = file_config.data_url {
            self.data_url.update(data_url, ConfigSource::File);
        }

        if let Some(geojson_file) = file_config.geojson_file {
            self.geojson_file.update(geojson_file, ConfigSource::File);
        }

        if let Some(csv_file) = file_config.csv_file {
            self.csv_file.update(csv_file, ConfigSource::File);
        }

        if let Some(basemap) = file_config.basemap {
            self.basemap.update(basemap.parse()?, ConfigSource::File);
        }

        if let Some(timeout) = file_config.http_timeout_secs {
            self.http_timeout_secs.update(Some(timeout), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PITSTOP_DATA_URL
        if let Ok(data_url) = env::var("PITSTOP_DATA_URL") {
            self.data_url.update(data_url, ConfigSource::Environment);
        }

        // PITSTOP_GEOJSON_FILE
        if let Ok(geojson_file) = env::var("PITSTOP_GEOJSON_FILE") {
            self.geojson_file.update(geojson_file, ConfigSource::Environment);
        }

        // PITSTOP_CSV_FILE
        if let Ok(csv_file) = env::var("PITSTOP_CSV_FILE") {
            self.csv_file.update(csv_file, ConfigSource::Environment);
        }

        // PITSTOP_BASEMAP
        if let Ok(basemap_str) = env::var("PITSTOP_BASEMAP") {
            match basemap_str.parse::<Basemap>() {
                Ok(basemap) => self.basemap.update(basemap, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PITSTOP_BASEMAP value '{}': expected OpenStreetMap, Stamen Terrain, or Stamen Toner",
                    basemap_str
                ),
            }
        }

        // PITSTOP_HTTP_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("PITSTOP_HTTP_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.http_timeout_secs.update(Some(timeout), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PITSTOP_HTTP_TIMEOUT_SECS value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_url) = overrides.data_url {
            self.data_url.update(data_url, ConfigSource::Cli);
        }

        if let Some(basemap) = overrides.basemap {
            self.basemap.update(basemap, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.http_timeout_secs {
            self.http_timeout_secs.update(Some(timeout), ConfigSource::Cli);
        }
    }

    /// URL of the circuits GeoJSON
    pub fn geojson_url(&self) -> String {
        format!("{}{}", self.data_url.value, self.geojson_file.value)
    }

    /// URL of the race-summary CSV
    pub fn csv_url(&self) -> String {
        format!("{}{}", self.data_url.value, self.csv_file.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("data_url".to_string(), (self.data_url.value.clone(), self.data_url.source));

        map.insert(
            "geojson_file".to_string(),
            (self.geojson_file.value.clone(), self.geojson_file.source),
        );

        map.insert("csv_file".to_string(), (self.csv_file.value.clone(), self.csv_file.source));

        map.insert("basemap".to_string(), (self.basemap.value.to_string(), self.basemap.source));

        map.insert(
            "http_timeout_secs".to_string(),
            (
                self.http_timeout_secs
                    .value
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                self.http_timeout_secs.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_url: Option<String>,
    geojson_file: Option<String>,
    csv_file: Option<String>,
    basemap: Option<String>,
    http_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_url: Option<String>,
    pub basemap: Option<Basemap>,
    pub http_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.data_url.value, DEFAULT_DATA_URL);
        assert_eq!(config.data_url.source, ConfigSource::Default);
        assert_eq!(config.basemap.value, Basemap::OpenStreetMap);
        assert_eq!(config.http_timeout_secs.value, None);
    }

    #[test]
    fn test_urls_concatenate_base_and_file() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(
            config.geojson_url(),
            "https://raw.githubusercontent.com/Stephen137/formula_one/main/data/f1-circuits.geojson"
        );
        assert_eq!(
            config.csv_url(),
            "https://raw.githubusercontent.com/Stephen137/formula_one/main/data/f1_summary.csv"
        );
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_url = "/srv/f1/"
csv_file = "results.csv"
basemap = "Stamen Toner"
http_timeout_secs = 30
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.data_url.value, "/srv/f1/");
        assert_eq!(config.data_url.source, ConfigSource::File);
        assert_eq!(config.csv_url(), "/srv/f1/results.csv");
        assert_eq!(config.geojson_file.source, ConfigSource::Default);
        assert_eq!(config.basemap.value, Basemap::StamenToner);
        assert_eq!(config.http_timeout_secs.value, Some(30));
    }

    #[test]
    fn test_file_with_bad_basemap_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"basemap = "Satellite""#).unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PitstopError::ConfigInvalid { ref key, .. } if key == "basemap"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = LayeredConfig::with_defaults().load_from_file("/no/such/pitstop.toml");
        assert!(matches!(result, Err(PitstopError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            data_url: Some("file:///data/".to_string()),
            basemap: Some(Basemap::StamenTerrain),
            http_timeout_secs: None,
        };

        config.update_from_cli(overrides);

        assert_eq!(config.data_url.value, "file:///data/");
        assert_eq!(config.data_url.source, ConfigSource::Cli);
        assert_eq!(config.basemap.value, Basemap::StamenTerrain);
        assert_eq!(config.http_timeout_secs.source, ConfigSource::Default);
        assert_eq!(config.csv_file.source, ConfigSource::Default);
    }

    #[test]
    fn test_empty_dataset_file_is_missing() {
        let mut config = LayeredConfig::with_defaults();
        assert!(config.validate().is_ok());

        config.csv_file.update(String::new(), ConfigSource::File);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PitstopError::ConfigMissing { ref key } if key == "csv_file"));
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 5);
        let (basemap, source) = &map["basemap"];
        assert_eq!(basemap, "OpenStreetMap");
        assert_eq!(*source, ConfigSource::Default);
        assert_eq!(map["http_timeout_secs"].0, "none");
    }
}
