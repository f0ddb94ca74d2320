use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::cache::DEFAULT_CACHE_CAPACITY;

/// Tuning knobs for an [`Engine`](crate::Engine).
///
/// Every field has a default, so a settings document only needs to name the
/// ones it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of keys in the clean cache.
    pub cache_capacity: usize,
    /// Delay between streaming ticks (one item per tick).
    pub stream_interval_ms: u64,
    /// Items classified per batch-report tick.
    pub report_chunk_size: usize,
    /// Delay between batch-report ticks; zero only yields to the scheduler.
    pub report_interval_ms: u64,
    /// Delay between rule-compilation ticks (one rule per tick).
    pub compile_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            stream_interval_ms: 5,
            report_chunk_size: 25,
            report_interval_ms: 0,
            compile_interval_ms: 0,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero cache capacity or chunk size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_capacity",
                reason: "must be at least 1".into(),
            });
        }
        if self.report_chunk_size == 0 {
            return Err(ConfigError::Invalid {
                field: "report_chunk_size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }

    #[must_use]
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    #[must_use]
    pub fn compile_interval(&self) -> Duration {
        Duration::from_millis(self.compile_interval_ms)
    }
}

/// A settings document: engine tuning plus the rule specifications to load.
///
/// Rules stay untyped here; they are validated when handed to
/// [`Engine::set_rules`](crate::Engine::set_rules).
///
/// ```
/// use itemsieve::Settings;
///
/// let settings = Settings::from_json(
///     r#"{ "engine": { "report_chunk_size": 50 },
///          "rules": [ { "kind": "glob", "pattern": "*.tmp" } ] }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.engine.report_chunk_size, 50);
/// assert_eq!(settings.rules.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub rules: Vec<serde_json::Value>,
}

impl Settings {
    /// Parse and validate a JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON or invalid engine settings.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(input)?;
        settings.engine.validate()?;
        Ok(settings)
    }

    /// Read a JSON settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O, parse, or validation failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }
}
