//! # Registry Error Types
//!
//! All errors that can occur while addressing entities, components and
//! systems through the registry.

use thiserror::Error;

/// Errors produced by registry operations.
///
/// Lookup and handle failures are recoverable and expected. `CapacityExceeded`
/// and `TypeMismatchOnCast` are configuration or invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The handle's generation no longer matches its slot.
    #[error("stale entity handle: index {index}, generation {generation}")]
    StaleHandle {
        /// Slot index carried by the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
    },

    /// The component type was never passed to `register_component_type`.
    #[error("component type not registered: {0}")]
    UnregisteredComponentType(&'static str),

    /// The entity does not own a component of the requested type.
    #[error("entity {index} has no {type_name} component")]
    ComponentNotFound {
        /// Slot index of the entity.
        index: u32,
        /// Name of the requested component type.
        type_name: &'static str,
    },

    /// More component types were registered than the signature width allows.
    #[error("component type capacity exceeded: at most {capacity} types can be registered")]
    CapacityExceeded {
        /// Maximum number of component types.
        capacity: usize,
    },

    /// Every entity slot is live.
    #[error("entity capacity exhausted: all {capacity} slots are in use")]
    EntityCapacityExhausted {
        /// Size of the slot table.
        capacity: u32,
    },

    /// A type-erased store resolved to the wrong concrete type.
    #[error("component store type mismatch for {0}")]
    TypeMismatchOnCast(&'static str),

    /// Invalid registry or simulation configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    /// Returns true for failures that are routine for callers to handle
    /// (stale handles and missing components).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StaleHandle { .. } | Self::ComponentNotFound { .. }
        )
    }
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EcsError::StaleHandle {
            index: 3,
            generation: 7,
        };
        assert_eq!(err.to_string(), "stale entity handle: index 3, generation 7");

        let err = EcsError::CapacityExceeded { capacity: 128 };
        assert!(err.to_string().contains("128"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(EcsError::StaleHandle {
            index: 0,
            generation: 0
        }
        .is_recoverable());
        assert!(EcsError::ComponentNotFound {
            index: 0,
            type_name: "Position"
        }
        .is_recoverable());
        assert!(!EcsError::CapacityExceeded { capacity: 128 }.is_recoverable());
        assert!(!EcsError::TypeMismatchOnCast("Position").is_recoverable());
    }
}
