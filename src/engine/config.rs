//! Engine and collection configuration.
//!
//! Both types load from JSON. `refresh_interval` is written in milliseconds,
//! with `-1` or `null` disabling background refresh:
//!
//! ```
//! use std::time::Duration;
//!
//! use pilum::engine::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{"collection_defaults": {"refresh_interval": 250}}"#,
//! ).unwrap();
//! assert_eq!(
//!     config.collection_defaults.refresh_interval,
//!     Some(Duration::from_millis(250))
//! );
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};

/// Default background refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Default upper bound on the `size` of a term query.
pub const DEFAULT_MAX_RESULT_WINDOW: usize = 10_000;

/// Per-collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// How often the background refresher runs. `None` disables it.
    #[serde(with = "interval_millis")]
    pub refresh_interval: Option<Duration>,

    /// Largest `size` a term query may ask for.
    pub max_result_window: usize,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL),
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }
}

impl CollectionSettings {
    /// Create settings with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Disable background refresh. Writes then only become visible on an
    /// explicit refresh.
    pub fn without_background_refresh(mut self) -> Self {
        self.refresh_interval = None;
        self
    }

    /// Set the largest allowed term query size.
    pub fn with_max_result_window(mut self, max_result_window: usize) -> Self {
        self.max_result_window = max_result_window;
        self
    }

    /// Check the settings for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval == Some(Duration::ZERO) {
            return Err(PilumError::invalid_argument(
                "refresh_interval must be positive, use -1 to disable",
            ));
        }
        if self.max_result_window == 0 {
            return Err(PilumError::invalid_argument(
                "max_result_window must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Settings used by `create_collection`.
    pub collection_defaults: CollectionSettings,
}

impl EngineConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default collection settings.
    pub fn with_collection_defaults(mut self, settings: CollectionSettings) -> Self {
        self.collection_defaults = settings;
        self
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.collection_defaults.validate()
    }
}

mod interval_millis {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(interval) => serializer.serialize_u64(interval.as_millis() as u64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        match Option::<i64>::deserialize(deserializer)? {
            None | Some(-1) => Ok(None),
            Some(ms) if ms >= 0 => Ok(Some(Duration::from_millis(ms as u64))),
            Some(ms) => Err(D::Error::custom(format!(
                "invalid refresh_interval {ms}, expected milliseconds or -1"
            ))),
        }
    }
}
