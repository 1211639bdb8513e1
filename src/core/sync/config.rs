/*!
 * Keyed Lock Configuration
 *
 * Runtime configuration for slot map backend selection and pool prewarming
 */

use crate::core::errors::{KeyedLockError, KeyedLockResult};
use serde::{Deserialize, Serialize};

/// Upper bound on slots allocated up front
pub const PREWARM_SLOTS_MAX: usize = 65_536;

/// Default stripe count for the striped backend
pub const DEFAULT_STRIPES: usize = 16;

/// Slot map backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapBackend {
    /// DashMap shards (lock-free reads, fine-grained writes)
    Sharded,
    /// Fixed number of RwLock-protected hash maps
    Striped,
    /// Auto-select
    Auto,
}

/// Keyed lock configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyedLockConfig {
    /// Preferred slot map backend
    pub backend: MapBackend,
    /// Stripe count (striped backend only, power of two)
    pub stripes: usize,
    /// Slots pushed into the pool at construction
    pub prewarm_slots: usize,
}

impl Default for KeyedLockConfig {
    fn default() -> Self {
        Self {
            backend: MapBackend::Auto,
            stripes: DEFAULT_STRIPES,
            prewarm_slots: 0,
        }
    }
}

impl KeyedLockConfig {
    /// Configuration for a small, known set of hot keys
    pub const fn low_cardinality() -> Self {
        Self {
            backend: MapBackend::Striped,
            stripes: 4,
            prewarm_slots: 8,
        }
    }

    /// Configuration for many distinct keys arriving concurrently
    pub const fn high_cardinality() -> Self {
        Self {
            backend: MapBackend::Sharded,
            stripes: DEFAULT_STRIPES,
            prewarm_slots: 64,
        }
    }

    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> KeyedLockResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> KeyedLockResult<()> {
        if self.stripes == 0 || !self.stripes.is_power_of_two() {
            return Err(KeyedLockError::InvalidConfig(format!(
                "stripe count {} is not a non-zero power of two",
                self.stripes
            )));
        }
        if self.prewarm_slots > PREWARM_SLOTS_MAX {
            return Err(KeyedLockError::InvalidConfig(format!(
                "prewarm_slots {} exceeds maximum {}",
                self.prewarm_slots, PREWARM_SLOTS_MAX
            )));
        }
        Ok(())
    }

    /// Resolve `Auto` to a concrete backend
    pub fn select_backend(&self) -> MapBackend {
        match self.backend {
            MapBackend::Auto => MapBackend::Sharded,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = KeyedLockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.select_backend(), MapBackend::Sharded);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(KeyedLockConfig::low_cardinality().validate().is_ok());
        assert!(KeyedLockConfig::high_cardinality().validate().is_ok());
        assert_eq!(
            KeyedLockConfig::low_cardinality().select_backend(),
            MapBackend::Striped
        );
    }

    #[test]
    fn test_rejects_bad_stripes() {
        for stripes in [0, 3, 12] {
            let config = KeyedLockConfig {
                stripes,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(KeyedLockError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_rejects_oversized_prewarm() {
        let config = KeyedLockConfig {
            prewarm_slots: PREWARM_SLOTS_MAX + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = KeyedLockConfig::from_json(r#"{"backend": "striped", "stripes": 32}"#).unwrap();
        assert_eq!(config.backend, MapBackend::Striped);
        assert_eq!(config.stripes, 32);
        assert_eq!(config.prewarm_slots, 0);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            KeyedLockConfig::from_json("{"),
            Err(KeyedLockError::ConfigParse(_))
        ));
        assert!(matches!(
            KeyedLockConfig::from_json(r#"{"stripes": 6}"#),
            Err(KeyedLockError::InvalidConfig(_))
        ));
    }
}
