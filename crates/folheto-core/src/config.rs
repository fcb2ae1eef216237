//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/folheto/config.toml)
//! 3. Environment variables (FOLHETO_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::viewer::ZoomBounds;

/// Environment variable prefix
const ENV_PREFIX: &str = "FOLHETO";

/// Default upload size ceiling: 50 MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Default simulated conversion latency in milliseconds
pub const DEFAULT_CONVERSION_DELAY_MS: u64 = 3000;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the JSON collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Simulated conversion latency in milliseconds (0 disables the delay)
    #[serde(default = "default_conversion_delay_ms")]
    pub conversion_delay_ms: u64,

    /// Minimum viewer zoom factor
    #[serde(default = "default_zoom_min")]
    pub zoom_min: f32,

    /// Maximum viewer zoom factor
    #[serde(default = "default_zoom_max")]
    pub zoom_max: f32,

    /// Viewer zoom step per zoom in/out
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            conversion_delay_ms: default_conversion_delay_ms(),
            zoom_min: default_zoom_min(),
            zoom_max: default_zoom_max(),
            zoom_step: default_zoom_step(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (FOLHETO_DATA_DIR, FOLHETO_MAX_UPLOAD_BYTES,
    ///    FOLHETO_CONVERSION_DELAY_MS)
    /// 2. Config file (~/.config/folheto/config.toml or FOLHETO_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_MAX_UPLOAD_BYTES", ENV_PREFIX)) {
            if let Ok(bytes) = val.parse() {
                self.max_upload_bytes = bytes;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_CONVERSION_DELAY_MS", ENV_PREFIX)) {
            if let Ok(ms) = val.parse() {
                self.conversion_delay_ms = ms;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with FOLHETO_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folheto")
            .join("config.toml")
    }

    /// Viewer zoom bounds derived from this configuration
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: self.zoom_min,
            max: self.zoom_max,
            step: self.zoom_step,
        }
    }

    /// Simulated conversion latency as a `Duration`
    pub fn conversion_delay(&self) -> Duration {
        Duration::from_millis(self.conversion_delay_ms)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folheto")
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_conversion_delay_ms() -> u64 {
    DEFAULT_CONVERSION_DELAY_MS
}

fn default_zoom_min() -> f32 {
    0.5
}

fn default_zoom_max() -> f32 {
    3.0
}

fn default_zoom_step() -> f32 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "FOLHETO_DATA_DIR",
        "FOLHETO_MAX_UPLOAD_BYTES",
        "FOLHETO_CONVERSION_DELAY_MS",
    ];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert!(config.data_dir.ends_with("folheto"));
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.conversion_delay_ms, 3000);
        assert_eq!(config.zoom_min, 0.5);
        assert_eq!(config.zoom_max, 3.0);
        assert_eq!(config.zoom_step, 0.2);
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FOLHETO_DATA_DIR", "/tmp/folheto-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/folheto-test"));
    }

    #[test]
    fn test_env_override_limits() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FOLHETO_MAX_UPLOAD_BYTES", "1048576");
        env::set_var("FOLHETO_CONVERSION_DELAY_MS", "0");
        config.apply_env_overrides();

        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.conversion_delay_ms, 0);
    }

    #[test]
    fn test_env_override_ignores_garbage() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FOLHETO_MAX_UPLOAD_BYTES", "not-a-number");
        config.apply_env_overrides();

        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/folheto"),
            max_upload_bytes: 1024,
            conversion_delay_ms: 0,
            zoom_min: 0.5,
            zoom_max: 2.0,
            zoom_step: 0.25,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("max_upload_bytes"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.max_upload_bytes, config.max_upload_bytes);
        assert_eq!(parsed.zoom_max, config.zoom_max);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            max_upload_bytes = 2048
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.max_upload_bytes, 2048);
        // Unspecified fields fall back to defaults
        assert_eq!(config.conversion_delay_ms, DEFAULT_CONVERSION_DELAY_MS);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("FOLHETO_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_zoom_bounds() {
        let config = Config::default();
        let bounds = config.zoom_bounds();
        assert_eq!(bounds.min, 0.5);
        assert_eq!(bounds.max, 3.0);
        assert_eq!(bounds.step, 0.2);
    }
}
