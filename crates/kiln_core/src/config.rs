//! # Registry Configuration
//!
//! Sizing parameters for an [`EntityRegistry`](crate::EntityRegistry),
//! loaded once at startup.
//!
//! ```toml
//! max_entities = 4096
//! initial_store_capacity = 64
//! store_growth_factor = 1.5
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};

/// Smallest allowed growth multiplier for component stores.
pub const MIN_STORE_GROWTH_FACTOR: f32 = 1.5;

/// Largest allowed growth multiplier for component stores.
pub const MAX_STORE_GROWTH_FACTOR: f32 = 8.0;

/// Largest allowed initial store capacity.
pub const MAX_INITIAL_STORE_CAPACITY: usize = 1 << 20;

/// Registry sizing parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Size of the fixed entity slot table.
    pub max_entities: u32,
    /// Initial backing capacity of every component store.
    pub initial_store_capacity: usize,
    /// Multiplier applied to a store's capacity when it is full.
    pub store_growth_factor: f32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_entities: 4096,
            initial_store_capacity: 64,
            store_growth_factor: MIN_STORE_GROWTH_FACTOR,
        }
    }
}

impl RegistryConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the document does not parse or
    /// fails validation.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read, does
    /// not parse, or fails validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.max_entities == u32::MAX {
            return Err(EcsError::InvalidConfig(
                "max_entities must be below u32::MAX".into(),
            ));
        }
        let growth = MIN_STORE_GROWTH_FACTOR..=MAX_STORE_GROWTH_FACTOR;
        if !growth.contains(&self.store_growth_factor) {
            return Err(EcsError::InvalidConfig(format!(
                "store_growth_factor must be within {growth:?}, got {}",
                self.store_growth_factor
            )));
        }
        if self.initial_store_capacity > MAX_INITIAL_STORE_CAPACITY {
            return Err(EcsError::InvalidConfig(format!(
                "initial_store_capacity must be at most {MAX_INITIAL_STORE_CAPACITY}, got {}",
                self.initial_store_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RegistryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_document() {
        let config = RegistryConfig::from_toml_str("max_entities = 16").unwrap();
        assert_eq!(config.max_entities, 16);
        assert_eq!(config.initial_store_capacity, 64);
        assert!((config.store_growth_factor - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_full_document() {
        let config = RegistryConfig::from_toml_str(
            "max_entities = 100\ninitial_store_capacity = 8\nstore_growth_factor = 2.0\n",
        )
        .unwrap();
        assert_eq!(config.max_entities, 100);
        assert_eq!(config.initial_store_capacity, 8);
        assert!((config.store_growth_factor - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_slow_growth() {
        let err = RegistryConfig::from_toml_str("store_growth_factor = 1.1").unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unbounded_growth() {
        for source in [
            "store_growth_factor = inf",
            "store_growth_factor = nan",
            "store_growth_factor = 1e30",
        ] {
            assert!(
                matches!(
                    RegistryConfig::from_toml_str(source),
                    Err(EcsError::InvalidConfig(_))
                ),
                "accepted {source:?}"
            );
        }
        assert!(RegistryConfig::from_toml_str("store_growth_factor = 8.0").is_ok());
    }

    #[test]
    fn test_rejects_huge_initial_capacity() {
        let source = format!("initial_store_capacity = {}", MAX_INITIAL_STORE_CAPACITY + 1);
        let err = RegistryConfig::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(_)));

        let source = format!("initial_store_capacity = {MAX_INITIAL_STORE_CAPACITY}");
        assert!(RegistryConfig::from_toml_str(&source).is_ok());
    }

    #[test]
    fn test_rejects_zero_entities() {
        assert!(RegistryConfig::from_toml_str("max_entities = 0").is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(RegistryConfig::from_toml_str("max_entites = 10").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryConfig::from_toml_file("/nonexistent/kiln/registry.toml").unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(_)));
    }
}
