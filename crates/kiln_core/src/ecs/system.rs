//! # Systems
//!
//! A system declares the component types it operates on and receives, once
//! per frame, every entity whose signature includes all of them.
//!
//! The registry owns each system's matching-entity cache and keeps it in sync
//! on every signature change; systems only read it.

use super::entity::{EntityHandle, EntityIndex};
use super::registry::EntityRegistry;
use super::signature::Signature;
use super::sparse::DenseSet;
use crate::error::EcsResult;

/// Per-frame update unit.
///
/// # Example
///
/// ```rust,ignore
/// struct Movement;
///
/// impl System for Movement {
///     fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature> {
///         registry.signature_for::<(Transform, Velocity)>()
///     }
///
///     fn update(&mut self, registry: &mut EntityRegistry, entities: &[EntityHandle]) {
///         for &entity in entities {
///             // ...
///         }
///     }
/// }
/// ```
pub trait System {
    /// Computes the signature an entity must include to be dispatched to
    /// this system.
    ///
    /// Called once, at registration. The result is fixed for the lifetime of
    /// the system.
    ///
    /// # Errors
    ///
    /// Typically [`EcsError::UnregisteredComponentType`](crate::EcsError::UnregisteredComponentType)
    /// when one of the declared types is unknown to the registry.
    fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature>;

    /// Frame update.
    ///
    /// `entities` is a snapshot of the matching-entity cache taken before the
    /// call. The system may mutate the registry; handles visited after such a
    /// mutation may be stale and should be checked with
    /// [`EntityRegistry::is_current`].
    fn update(&mut self, registry: &mut EntityRegistry, entities: &[EntityHandle]);

    /// Returns the name of this system for diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A registered system with its fixed requirement and entity cache.
pub(crate) struct SystemEntry {
    /// `None` only while the system is running.
    pub(crate) system: Option<Box<dyn System>>,
    pub(crate) name: String,
    pub(crate) required: Signature,
    pub(crate) matching: DenseSet<EntityHandle>,
}

impl SystemEntry {
    pub(crate) fn new(system: Box<dyn System>, required: Signature) -> Self {
        let name = system.name().to_owned();
        Self {
            system: Some(system),
            name,
            required,
            matching: DenseSet::default(),
        }
    }

    /// Moves `entity` in or out of the cache according to `signature`.
    ///
    /// Returns true if membership changed.
    pub(crate) fn refresh(&mut self, entity: EntityHandle, signature: &Signature) -> bool {
        let wanted = signature.matches(&self.required);
        let present = self.matching.contains(entity.index());
        match (present, wanted) {
            (false, true) => {
                self.matching.insert(entity.index(), entity);
                true
            }
            (true, false) => {
                self.matching.remove(entity.index());
                true
            }
            _ => false,
        }
    }

    /// Empties the cache.
    pub(crate) fn clear(&mut self) {
        self.matching.clear();
    }

    /// Drops `entity` from the cache.
    pub(crate) fn forget(&mut self, entity: EntityIndex) {
        self.matching.remove(entity);
    }
}
