use crate::api::DEFAULT_OSRM_BASE_URL;
use crate::error::DistanceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub location: LocationConfig,
    pub routing: RoutingConfig,
    pub cache: CacheConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocationConfig {
    pub auto_locate: bool, // Use IP geolocation if true
    pub manual_lat: f64,   // Latitude used if auto_locate is false
    pub manual_lon: f64,   // Longitude used if auto_locate is false
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub db_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                auto_locate: true,
                manual_lat: 39.7392,
                manual_lon: -104.9903,
            },
            routing: RoutingConfig {
                base_url: DEFAULT_OSRM_BASE_URL.to_string(),
                request_timeout_seconds: 10,
            },
            cache: CacheConfig {
                db_path: "rec_distance_cache.db".to_string(),
            },
        }
    }
}

impl Config {
    /// Loads the config file at `path`.
    /// If it doesn't exist or fails to parse, writes and returns the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse {}: {}. Using defaults.", path.display(), e),
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        if let Err(e) = default_config.save(path) {
            warn!("Could not write default config to disk: {}", e);
        }

        info!("Loaded default configuration.");
        default_config
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DistanceError> {
        let toml_string =
            toml::to_string_pretty(self).map_err(|e| DistanceError::Config(e.to_string()))?;
        fs::write(path, toml_string).map_err(|e| DistanceError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("router.project-osrm.org"));
    }

    #[test]
    fn test_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[location]
auto_locate = false
manual_lat = 39.75
manual_lon = -104.95

[routing]
base_url = "http://localhost:5000/table/v1"
request_timeout_seconds = 3

[cache]
db_path = "/tmp/other.db"
"#,
        )
        .unwrap();

        let config = Config::load(&path);
        assert!(!config.location.auto_locate);
        assert_eq!(config.location.manual_lat, 39.75);
        assert_eq!(config.routing.base_url, "http://localhost:5000/table/v1");
        assert_eq!(config.routing.request_timeout_seconds, 3);
        assert_eq!(config.cache.db_path, "/tmp/other.db");
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = not [valid").unwrap();

        assert_eq!(Config::load(&path), Config::default());
    }
}
