use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

use crate::bencode::decode::DEFAULT_MAX_DEPTH;
use crate::bencode::sink::DEFAULT_CHUNK_SIZE;
use crate::bencode::{DecoderConfig, EncoderConfig};

pub const DEFAULT_CONFIG_PATH: &str = "cbencode.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chunk_size: usize,
    pub max_depth: usize,
    pub sort_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            sort_keys: false,
        }
    }
}

impl Config {
    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml = toml::to_string(self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn encoder_config(&self) -> Result<EncoderConfig, ConfigError> {
        let chunk_size = NonZeroUsize::new(self.chunk_size)
            .ok_or_else(|| ConfigError::Invalid("chunk_size must be at least 1".to_string()))?;
        Ok(EncoderConfig {
            chunk_size,
            sort_keys: self.sort_keys,
            max_depth: self.max_depth,
        })
    }

    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            max_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.chunk_size, 1000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbencode.toml");
        fs::write(&path, "sort_keys = true\nchunk_size = 64\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.sort_keys);
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);

        let encoder = config.encoder_config().unwrap();
        assert_eq!(encoder.chunk_size.get(), 64);
        assert!(encoder.sort_keys);
        assert_eq!(encoder.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbencode.toml");
        fs::write(&path, "chunk_size = 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbencode.toml");
        let config = Config {
            chunk_size: 7,
            max_depth: 12,
            sort_keys: true,
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbencode.toml");
        fs::write(&path, "chunk_size = \"lots\"").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
