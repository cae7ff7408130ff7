//! # Component Types
//!
//! Components are plain data attached to entities. Every component type used
//! with a registry is registered once and assigned a small sequential id
//! (`0..128`) that doubles as its bit in a [`Signature`](super::Signature).

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::bitset::FixedBitset128;
use crate::error::{EcsError, EcsResult};

/// Marker trait for component data.
///
/// Implemented for every `'static` type; registration with
/// [`EntityRegistry::register_component_type`](crate::EntityRegistry::register_component_type)
/// is what makes a type usable.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Maximum number of component types per registry.
pub const MAX_COMPONENT_TYPES: usize = FixedBitset128::BITS;

/// Sequential id of a registered component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Returns the id as a bit index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Metadata of a registered component type.
#[derive(Clone, Copy, Debug)]
pub struct ComponentInfo {
    /// Assigned id.
    pub id: ComponentTypeId,
    /// Rust type name, for diagnostics.
    pub name: &'static str,
}

/// Maps Rust types to sequential component ids.
#[derive(Debug, Default)]
pub struct ComponentTypes {
    ids: HashMap<TypeId, ComponentTypeId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentTypes {
    /// Creates an empty type table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, returning its id and whether it was newly added.
    ///
    /// Registering an already known type returns its existing id.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `T` is new and all
    /// [`MAX_COMPONENT_TYPES`] ids are taken. Existing registrations are
    /// left untouched.
    pub fn register<T: Component>(&mut self) -> EcsResult<(ComponentTypeId, bool)> {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return Ok((id, false));
        }
        if self.infos.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::CapacityExceeded {
                capacity: MAX_COMPONENT_TYPES,
            });
        }

        let id = ComponentTypeId(self.infos.len() as u8);
        self.ids.insert(TypeId::of::<T>(), id);
        self.infos.push(ComponentInfo {
            id,
            name: type_name::<T>(),
        });
        Ok((id, true))
    }

    /// Looks up the id of `T`.
    #[inline]
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Looks up the id of `T`, failing if it was never registered.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponentType`].
    #[inline]
    pub fn require<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.id_of::<T>()
            .ok_or(EcsError::UnregisteredComponentType(type_name::<T>()))
    }

    /// Metadata for a registered id.
    #[must_use]
    pub fn info(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.infos.get(id.index())
    }

    /// Number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if no type has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
