use std::{path::Path, str::FromStr, time::Duration};

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BridgeConfig {
    #[validate(length(min = 1))]
    pub address: String,
    pub ansi: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_owned(),
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MorseConfig {
    pub dot_ms: u64,
    pub dash_ms: u64,
    pub symbol_gap_ms: u64,
    pub char_gap_ms: u64,
    #[validate(range(min = 1, max = 254))]
    pub brightness: u8,
}

impl MorseConfig {
    pub fn dot(&self) -> Duration {
        Duration::from_millis(self.dot_ms)
    }

    pub fn dash(&self) -> Duration {
        Duration::from_millis(self.dash_ms)
    }

    pub fn symbol_gap(&self) -> Duration {
        Duration::from_millis(self.symbol_gap_ms)
    }

    pub fn char_gap(&self) -> Duration {
        Duration::from_millis(self.char_gap_ms)
    }
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            dot_ms: 200,
            dash_ms: 600,
            symbol_gap_ms: 200,
            char_gap_ms: 600,
            brightness: 254,
        }
    }
}

fn validate_disco(disco: &DiscoConfig) -> Result<(), ValidationError> {
    if disco.min_brightness > disco.max_brightness {
        return Err(ValidationError::new("brightness_range"));
    }

    if disco.min_saturation > disco.max_saturation {
        return Err(ValidationError::new("saturation_range"));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_disco"))]
pub struct DiscoConfig {
    #[validate(range(min = 1))]
    pub tick_ms: u64,
    #[validate(range(max = 254))]
    pub min_brightness: u8,
    #[validate(range(max = 254))]
    pub max_brightness: u8,
    #[validate(range(max = 254))]
    pub min_saturation: u8,
    #[validate(range(max = 254))]
    pub max_saturation: u8,
}

impl DiscoConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for DiscoConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            min_brightness: 50,
            max_brightness: 254,
            min_saturation: 150,
            max_saturation: 254,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub bridge: BridgeConfig,
    #[validate(nested)]
    pub morse: MorseConfig,
    #[validate(nested)]
    pub disco: DiscoConfig,
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(full: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(full)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let full = std::fs::read_to_string(path)?;
        full.parse()
    }

    /// Load the configuration from the user's config directory, if it exists
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading configuration");
                Self::load_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("huebridge");
            path.push("config.toml");
            path
        })
    }

    pub fn to_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
