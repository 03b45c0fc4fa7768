use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::track::TrackFormat;

pub const DEFAULT_CACHE_SIZE: usize = 8;
pub const DEFAULT_BPM_TOLERANCE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub mixing: MixingConfig,
    #[serde(default)]
    pub library: Vec<TrackRecord>,
    /// playlist name -> 1-based library indices
    #[serde(default)]
    pub playlists: BTreeMap<String, Vec<usize>>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.size == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }

        let mut seen = HashSet::new();
        for record in &self.library {
            if record.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle);
            }
            if !seen.insert(record.title.as_str()) {
                return Err(ConfigError::DuplicateTitle(record.title.clone()));
            }
            if record.bpm == 0 {
                return Err(ConfigError::ZeroBpm(record.title.clone()));
            }
            match record.format {
                TrackFormat::Mp3 => {
                    record.require(record.bitrate, "bitrate")?;
                }
                TrackFormat::Wav => {
                    record.require(record.sample_rate, "sample_rate")?;
                    record.require(record.bit_depth, "bit_depth")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "DJ Session".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CacheConfig {
    pub size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CACHE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MixingConfig {
    #[serde(default = "default_bpm_tolerance")]
    pub bpm_tolerance: u32,
    #[serde(default = "default_true")]
    pub auto_sync: bool,
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            bpm_tolerance: DEFAULT_BPM_TOLERANCE,
            auto_sync: true,
        }
    }
}

/// Declarative description of a library track
#[derive(Debug, Deserialize, Clone)]
pub struct TrackRecord {
    pub format: TrackFormat,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    /// seconds
    pub duration: u32,
    pub bpm: u32,
    /// mp3 only, kbps
    pub bitrate: Option<u32>,
    /// mp3 only
    #[serde(default = "default_true")]
    pub has_tags: bool,
    /// wav only, Hz
    pub sample_rate: Option<u32>,
    /// wav only
    pub bit_depth: Option<u32>,
}

impl TrackRecord {
    pub fn require(&self, value: Option<u32>, field: &'static str) -> Result<u32, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingField {
            title: self.title.clone(),
            format: self.format,
            field,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cache size must be at least 1")]
    ZeroCacheSize,

    #[error("library track with an empty title")]
    EmptyTitle,

    #[error("library track \"{0}\" is listed more than once")]
    DuplicateTitle(String),

    #[error("library track \"{0}\" has a BPM of 0")]
    ZeroBpm(String),

    #[error("{format} track \"{title}\" is missing `{field}`")]
    MissingField {
        title: String,
        format: TrackFormat,
        field: &'static str,
    },
}

fn default_true() -> bool {
    true
}

fn default_bpm_tolerance() -> u32 {
    DEFAULT_BPM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
version = 1

[session]
name = "Friday Set"

[cache]
size = 3

[mixing]
bpm_tolerance = 6
auto_sync = false

[[library]]
format = "mp3"
title = "Sunset Lover"
artists = ["Petit Biscuit"]
duration = 180
bpm = 120
bitrate = 320

[[library]]
format = "wav"
title = "Strobe"
artists = ["Deadmau5"]
duration = 645
bpm = 128
sample_rate = 44100
bit_depth = 16

[playlists]
chill = [1, 2]
peak = [2]
"#;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str(FULL_CONFIG)?;
        cfg.validate()?;

        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.session.name, "Friday Set");
        assert_eq!(cfg.cache.size, 3);
        assert_eq!(
            cfg.mixing,
            MixingConfig {
                bpm_tolerance: 6,
                auto_sync: false
            }
        );

        assert_eq!(cfg.library.len(), 2);
        assert_eq!(cfg.library[0].format, TrackFormat::Mp3);
        // has_tags defaults to true
        assert!(cfg.library[0].has_tags);
        assert_eq!(cfg.library[1].sample_rate, Some(44_100));

        assert_eq!(cfg.playlists["chill"], vec![1, 2]);
        assert_eq!(cfg.playlists.keys().collect::<Vec<_>>(), ["chill", "peak"]);

        Ok(())
    }

    #[test]
    fn test_defaults_for_missing_sections() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("version = 1")?;

        assert_eq!(cfg.cache.size, DEFAULT_CACHE_SIZE);
        assert_eq!(cfg.mixing.bpm_tolerance, DEFAULT_BPM_TOLERANCE);
        assert!(cfg.mixing.auto_sync);
        assert_eq!(cfg.session.name, "DJ Session");
        assert!(cfg.library.is_empty());
        assert!(cfg.playlists.is_empty());

        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_configs() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("version = 1\n[cache]\nsize = 0")?;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroCacheSize)));

        let duplicated = r#"
version = 1
[[library]]
format = "mp3"
title = "Strobe"
duration = 10
bpm = 100
bitrate = 128

[[library]]
format = "wav"
title = "Strobe"
duration = 645
bpm = 128
sample_rate = 44100
bit_depth = 16
"#;
        let cfg: Config = toml::from_str(duplicated)?;
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicateTitle(t)) if t == "Strobe"));

        let missing = r#"
version = 1
[[library]]
format = "wav"
title = "No Rate"
duration = 10
bpm = 100
bit_depth = 16
"#;
        let cfg: Config = toml::from_str(missing)?;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingField { field: "sample_rate", .. })
        ));

        Ok(())
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dj_config.toml");
        std::fs::write(&path, FULL_CONFIG)?;

        let cfg = Config::load(&path)?;
        assert_eq!(cfg.library.len(), 2);

        assert!(Config::load(dir.path().join("missing.toml")).is_err());
        Ok(())
    }
}
