// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use keepsake_core::cache::{FrameStamp, DEFAULT_LIFETIME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Switches for the cache's trace lines.
///
/// They only decide what gets written to the log, never what the cache does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFlags {
    /// Master switch for cache activity.
    pub cache: bool,
    /// Also log repairs and invalidations.
    pub cache_update: bool,
    /// Also log misses, time-outs, and other high-volume events.
    pub verbose: bool,
}

impl LogFlags {
    /// Every trace line enabled.
    pub const ALL: LogFlags = LogFlags {
        cache: true,
        cache_update: true,
        verbose: true,
    };

    /// Stores, replacements, and purges.
    pub fn storage(&self) -> bool {
        self.cache
    }

    /// Repairs of dirty entries.
    pub fn repairs(&self) -> bool {
        self.cache && self.cache_update
    }

    /// Invalidations and touches.
    pub fn invalidations(&self) -> bool {
        self.cache && self.cache_update && self.verbose
    }

    /// Misses and time-outs.
    pub fn misses(&self) -> bool {
        self.cache && self.verbose
    }
}

/// Configuration of a [`ResourceCache`](super::ResourceCache).
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```
/// use keepsake_data::CacheConfig;
///
/// let config = CacheConfig::from_ron("(lifetime: (elapsed: 2.0, frame: 30))").unwrap();
/// assert_eq!(config.lifetime.frame, 30);
/// assert!(!config.log.cache);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an unreferenced entry may sit idle, on both axes, before the
    /// sweep drops it.
    pub lifetime: FrameStamp,
    /// Number of entries to reserve room for up front.
    pub initial_capacity: usize,
    /// Trace line switches.
    pub log: LogFlags,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lifetime: DEFAULT_LIFETIME,
            initial_capacity: 64,
            log: LogFlags::default(),
        }
    }
}

/// An error raised while loading a [`CacheConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read cache config '{}': {}", .path.display(), .source)]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The RON document is malformed.
    #[error("invalid RON cache config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The JSON document is malformed.
    #[error("invalid JSON cache config: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `.ron` nor `.json`.
    #[error("unsupported cache config format: '{}'", .0.display())]
    UnsupportedFormat(PathBuf),
    /// The lifetime cannot be compared against.
    #[error("invalid cache lifetime: {0}")]
    InvalidLifetime(String),
}

impl CacheConfig {
    /// Parses a RON document.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()
    }

    /// Parses a JSON document.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()
    }

    /// Loads a `.ron` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_deref() {
            Some("ron") => Self::from_ron(&read()?),
            Some("json") => Self::from_json(&read()?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Serializes the config as pretty RON.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let elapsed = self.lifetime.elapsed;
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(ConfigError::InvalidLifetime(format!(
                "elapsed time must be a non-negative number of seconds, got {elapsed}"
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.lifetime, FrameStamp::new(4.0, 8));
        assert_eq!(config.log, LogFlags::default());
    }

    #[test]
    fn test_log_flag_gating() {
        let only_cache = LogFlags {
            cache: true,
            ..LogFlags::default()
        };
        assert!(only_cache.storage());
        assert!(!only_cache.repairs());
        assert!(!only_cache.misses());

        let update = LogFlags {
            cache: true,
            cache_update: true,
            verbose: false,
        };
        assert!(update.repairs());
        assert!(!update.invalidations());

        assert!(LogFlags::ALL.invalidations());
        assert!(!LogFlags {
            cache: false,
            ..LogFlags::ALL
        }
        .misses());
    }

    #[test]
    fn test_from_json_with_partial_fields() {
        let config = CacheConfig::from_json(r#"{ "log": { "cache": true, "verbose": true } }"#).unwrap();
        assert_eq!(config.lifetime, DEFAULT_LIFETIME);
        assert!(config.log.misses());
        assert!(!config.log.repairs());
    }

    #[test]
    fn test_rejects_negative_lifetime() {
        let err = CacheConfig::from_ron("(lifetime: (elapsed: -1.0, frame: 8))").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLifetime(_)));
    }

    #[test]
    fn test_rejects_malformed_ron() {
        assert!(matches!(
            CacheConfig::from_ron("(lifetime: "),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = CacheConfig {
            lifetime: FrameStamp::new(1.5, 12),
            initial_capacity: 8,
            log: LogFlags::ALL,
        };
        let text = config.to_ron().unwrap();
        assert_eq!(CacheConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "initial_capacity": 3 }}"#).unwrap();

        let config = CacheConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_capacity, 3);
    }

    #[test]
    fn test_from_file_errors() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            CacheConfig::from_file(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("cache.ron");
        assert!(matches!(
            CacheConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
