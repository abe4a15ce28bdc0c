//! Noor Configuration System
//!
//! Location source, calculation method, reflection backend and display.
//! Config file: ~/.config/noor/config.toml or /etc/noor/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::labels::Language;
use crate::location::FALLBACK_COORDINATE;
use crate::oracle::{CalculationMethod, Madhab, MethodName};
use crate::reflection::ReflectionConfig;

const REDACTED_API_KEY: &str = "[REDACTED: API key]";

/// Where the coordinate comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// IP geolocation lookup, fallback city on failure
    #[default]
    Ip,
    /// Coordinates from this file
    Fixed,
    /// No location source; fallback city without an advisory
    Fallback,
}

/// Location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: LocationMode,

    /// Used when mode = "fixed"
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Lookup endpoint for mode = "ip"
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
}

fn default_latitude() -> f64 {
    FALLBACK_COORDINATE.latitude()
}

fn default_longitude() -> f64 {
    FALLBACK_COORDINATE.longitude()
}

fn default_lookup_url() -> String {
    "http://ip-api.com/json/?fields=status,message,lat,lon".to_string()
}

fn default_lookup_timeout() -> u64 {
    5
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::default(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            lookup_url: default_lookup_url(),
            timeout_secs: default_lookup_timeout(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub language: Language,

    /// Dashboard clock period
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_tick_millis() -> u64 {
    1000
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            tick_millis: default_tick_millis(),
        }
    }
}

/// Main Noor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoorConfig {
    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub calculation: CalculationMethod,

    #[serde(default)]
    pub reflection: ReflectionConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl NoorConfig {
    /// Get default user config path: $XDG_CONFIG_HOME/noor/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("noor").join("config.toml"))
    }

    /// Get system config path: /etc/noor/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/noor/config.toml")
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: NoorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. User config (~/.config/noor/config.toml)
    /// 2. System config (/etc/noor/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string = self.to_toml()?;
        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// TOML for printing, with the reflection API key masked
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.reflection.api_key.is_some() {
            shown.reflection.api_key = Some(REDACTED_API_KEY.to_string());
        }
        shown.to_toml()
    }

    /// Pin the location to fixed coordinates
    pub fn set_fixed_location(&mut self, latitude: f64, longitude: f64) {
        self.location.mode = LocationMode::Fixed;
        self.location.latitude = latitude;
        self.location.longitude = longitude;
    }

    /// Set calculation method by name
    pub fn set_method(&mut self, name: &str) -> Result<()> {
        self.calculation.method = MethodName::parse(name)
            .with_context(|| format!("Invalid calculation method: '{}'", name))?;
        Ok(())
    }

    /// Set Asr convention by name
    pub fn set_madhab(&mut self, name: &str) -> Result<()> {
        self.calculation.madhab = Madhab::parse(name).with_context(|| {
            format!("Invalid madhab: '{}'. Valid values: shafi, hanafi", name)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::ReflectionProvider;

    #[test]
    fn test_default_config() {
        let config = NoorConfig::default();
        assert_eq!(config.location.mode, LocationMode::Ip);
        assert_eq!(config.location.latitude, 24.8607);
        assert_eq!(config.calculation.method, MethodName::Karachi);
        assert_eq!(config.calculation.madhab, Madhab::Shafi);
        assert_eq!(config.display.language, Language::Urdu);
        assert_eq!(config.display.tick_millis, 1000);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
            [location]
            mode = "fixed"
            latitude = 31.5204
            longitude = 74.3587

            [calculation]
            method = "muslim_world_league"
            madhab = "hanafi"

            [reflection]
            provider = "ollama"
            endpoint = "http://localhost:11434"
            model = "llama3.2:3b"
        "#;
        let config: NoorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.location.mode, LocationMode::Fixed);
        assert_eq!(config.location.longitude, 74.3587);
        assert_eq!(config.calculation.method, MethodName::MuslimWorldLeague);
        assert_eq!(config.calculation.madhab, Madhab::Hanafi);
        assert_eq!(config.reflection.provider, ReflectionProvider::Ollama);
        assert!(config.reflection.enabled);
        assert_eq!(config.display.language, Language::Urdu);
    }

    #[test]
    fn test_setters() {
        let mut config = NoorConfig::default();
        config.set_method("Umm al-Qura").unwrap();
        assert_eq!(config.calculation.method, MethodName::UmmAlQura);
        assert!(config.set_method("lunar").is_err());

        config.set_madhab("Hanafi").unwrap();
        assert_eq!(config.calculation.madhab, Madhab::Hanafi);
        assert!(config.set_madhab("maliki").is_err());

        config.set_fixed_location(21.4225, 39.8262);
        assert_eq!(config.location.mode, LocationMode::Fixed);
        assert_eq!(config.location.latitude, 21.4225);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut original = NoorConfig::default();
        original.display.language = Language::English;
        original.set_fixed_location(51.5072, -0.1276);
        original.save_to(&path).unwrap();

        let loaded = NoorConfig::load_from(&path).unwrap();
        assert_eq!(loaded.display.language, Language::English);
        assert_eq!(loaded.location.mode, LocationMode::Fixed);
        assert_eq!(loaded.location.latitude, 51.5072);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[calculation]\nmethod = 42\n").unwrap();
        assert!(NoorConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_display_toml_masks_api_key() {
        let mut config = NoorConfig::default();
        config.reflection.api_key = Some("AIza-secret-value".to_string());

        let shown = config.to_display_toml().unwrap();
        assert!(!shown.contains("AIza-secret-value"));
        assert!(shown.contains(REDACTED_API_KEY));

        // Saving keeps the real key
        assert!(config.to_toml().unwrap().contains("AIza-secret-value"));
        assert_eq!(config.reflection.api_key.as_deref(), Some("AIza-secret-value"));

        let without_key = NoorConfig::default().to_display_toml().unwrap();
        assert!(!without_key.contains(REDACTED_API_KEY));
    }
}
