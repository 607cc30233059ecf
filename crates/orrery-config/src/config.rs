//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet geometry and root patch layout.
    pub planet: PlanetConfig,
    /// Split/merge thresholds.
    pub lod: LodConfig,
    /// Mesh generation workers.
    pub generation: GenerationConfig,
    /// Orbiting camera used by the headless driver.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet radius in world units.
    pub radius: f64,
    /// Root patches per face row; each face gets `patch_row²` roots.
    pub patch_row: u32,
    /// Distance from the planet centre beyond which all patches are unloaded.
    pub unload_distance: f64,
}

/// Distances are in units of patch width.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Split when closer than `width * dist_min`.
    pub dist_min: f64,
    /// Merge when farther than `width * dist_max`.
    pub dist_max: f64,
    /// Patches no wider than this never split.
    pub min_size: f64,
    pub max_lod: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Worker threads for mesh generation (0 = pick from CPU count).
    pub worker_threads: usize,
    /// Samples per patch edge when computing mesh bounds.
    pub mesh_resolution: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit altitude above the surface in world units.
    pub orbit_altitude: f64,
    /// Orbit angular speed in radians per second.
    pub orbit_speed: f64,
    /// Frames to simulate before exiting.
    pub frames: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Frames between stats log lines (0 = never).
    pub stats_interval: u32,
}

// --- Default implementations ---

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 6000.0,
            patch_row: 1,
            unload_distance: 80_000.0,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            dist_min: 3.0,
            dist_max: 3.1,
            min_size: 0.4096,
            max_lod: 25,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            mesh_resolution: 8,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_altitude: 200.0,
            orbit_speed: 0.05,
            frames: 600,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stats_interval: 60,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    fn read_file(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = Self::read_file(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join("config.ron");
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized)
            .map_err(|source| ConfigError::Write { path: config_path, source })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read_file(&config_dir.join("config.ron"))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("dist_min: 3.0"));
        assert!(ron_str.contains("max_lod: 25"));
    }

    #[test]
    fn test_default_lod_band() {
        let lod = LodConfig::default();
        assert!(lod.dist_max > lod.dist_min);
        assert_eq!(lod.min_size, 0.4096);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(planet: (radius: 100.0), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet.radius, 100.0);
        assert_eq!(config.planet.patch_row, 1);
        assert_eq!(config.lod, LodConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.radius = 1234.5;
        config.lod.max_lod = 12;
        config.generation.worker_threads = 3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.lod.dist_max = 3.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().lod.dist_max, 3.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        match &err {
            ConfigError::Parse { path, .. } => assert_eq!(path, &dir.path().join("config.ron")),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(err.to_string().contains("malformed planet config"));
    }

    #[test]
    fn test_reload_of_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("config.ron"));
    }
}
