//! # Entity Registry
//!
//! The central owner of all entity, component and system state.
//!
//! - A fixed-size slot table issues generational [`EntityHandle`]s
//! - One [`ComponentStore`] per registered component type
//! - One [`Signature`] per entity slot
//! - Registered [`System`]s with their matching-entity caches
//!
//! Every signature change re-evaluates the affected entity against every
//! system, so caches are always exact.

use std::any::type_name;
use std::collections::VecDeque;

use tracing::{debug, error, trace, warn};

use super::component::{Component, ComponentInfo, ComponentTypeId, ComponentTypes};
use super::entity::{EntityHandle, EntityIndex, EntitySlot};
use super::signature::{ComponentSet, Signature};
use super::storage::{AnyComponentStore, ComponentStore};
use super::system::{System, SystemEntry};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// Position of a system in registration (and dispatch) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(usize);

impl SystemId {
    /// Registration index of the system.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The entity/component/system registry.
///
/// Single-threaded: every operation runs to completion on the calling
/// thread. References returned by component accessors are valid until the
/// next mutating call.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = EntityRegistry::new();
/// registry.register_component_type::<Position>()?;
///
/// let entity = registry.create_entity()?;
/// registry.add_component(entity, Position::new(0.0, 0.0, 0.0))?;
/// registry.update_systems();
/// ```
pub struct EntityRegistry {
    config: RegistryConfig,
    /// Slot table, grown up to `config.max_entities`.
    slots: Vec<EntitySlot>,
    /// Signature per slot; empty for dead slots.
    signatures: Vec<Signature>,
    /// Dead slots waiting for reuse, oldest first.
    free_list: VecDeque<EntityIndex>,
    alive_count: usize,
    types: ComponentTypes,
    /// Stores indexed by component type id.
    stores: Vec<Box<dyn AnyComponentStore>>,
    /// Systems in registration order.
    systems: Vec<SystemEntry>,
    /// Reused snapshot buffer for dispatch.
    dispatch_buffer: Vec<EntityHandle>,
}

impl EntityRegistry {
    /// Creates a registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(RegistryConfig::default())
    }

    /// Creates a registry from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: RegistryConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RegistryConfig) -> Self {
        debug!(
            max_entities = config.max_entities,
            initial_store_capacity = config.initial_store_capacity,
            "creating entity registry"
        );
        Self {
            slots: Vec::new(),
            signatures: Vec::new(),
            free_list: VecDeque::new(),
            alive_count: 0,
            types: ComponentTypes::new(),
            stores: Vec::new(),
            systems: Vec::new(),
            dispatch_buffer: Vec::new(),
            config,
        }
    }

    /// The configuration this registry was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Component types
    // =========================================================================

    /// Registers `T` and creates its store, returning its type id.
    ///
    /// Registering the same type again returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] when `T` would be the 129th
    /// type. Earlier registrations are unaffected.
    pub fn register_component_type<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let (id, added) = self.types.register::<T>().map_err(|e| {
            error!(component = type_name::<T>(), "{e}");
            e
        })?;

        if added {
            // A store never outgrows the slot table
            let capacity = self
                .config
                .initial_store_capacity
                .min(self.config.max_entities as usize);
            self.stores.push(Box::new(ComponentStore::<T>::with_capacity(
                capacity,
                self.config.store_growth_factor,
            )));
            debug!(component = type_name::<T>(), id = id.index(), "registered component type");
        }
        Ok(id)
    }

    /// Id of `T`, if registered.
    #[inline]
    #[must_use]
    pub fn component_type_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.types.id_of::<T>()
    }

    /// Metadata of a registered component type.
    #[must_use]
    pub fn component_info(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.types.info(id)
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn component_type_count(&self) -> usize {
        self.types.len()
    }

    /// Signature combining the type ids of every type in `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponentType`] if a type in `S` was
    /// never registered.
    pub fn signature_for<S: ComponentSet>(&self) -> EcsResult<Signature> {
        S::signature(&self.types)
    }

    fn store_ref<T: Component>(&self, id: ComponentTypeId) -> EcsResult<&ComponentStore<T>> {
        let erased = self
            .stores
            .get(id.index())
            .ok_or_else(|| type_mismatch::<T>("no store"))?;
        let found = erased.component_name();
        erased
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or_else(|| type_mismatch::<T>(found))
    }

    fn store_mut<T: Component>(&mut self, id: ComponentTypeId) -> EcsResult<&mut ComponentStore<T>> {
        let erased = self
            .stores
            .get_mut(id.index())
            .ok_or_else(|| type_mismatch::<T>("no store"))?;
        let found = erased.component_name();
        erased
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or_else(|| type_mismatch::<T>(found))
    }

    /// The packed store of `T`, for bulk iteration.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponentType`] if `T` is unknown.
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        let id = self.types.require::<T>()?;
        self.store_ref::<T>(id)
    }

    /// The packed values of `T`, mutably.
    ///
    /// Only values are exposed; attaching and detaching go through the
    /// registry so signatures stay in sync.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponentType`] if `T` is unknown.
    pub fn store_values_mut<T: Component>(&mut self) -> EcsResult<&mut [T]> {
        let id = self.types.require::<T>()?;
        Ok(self.store_mut::<T>(id)?.as_mut_slice())
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Returns true if `handle` refers to the live occupant of its slot.
    #[inline]
    #[must_use]
    pub fn is_current(&self, handle: EntityHandle) -> bool {
        self.slots
            .get(handle.index() as usize)
            .is_some_and(|slot| slot.alive && slot.generation == handle.generation())
    }

    /// Validates `handle`, returning its slot index.
    #[inline]
    fn check(&self, handle: EntityHandle) -> EcsResult<usize> {
        if self.is_current(handle) {
            Ok(handle.index() as usize)
        } else {
            Err(EcsError::StaleHandle {
                index: handle.index(),
                generation: handle.generation(),
            })
        }
    }

    /// Creates an entity with an empty signature.
    ///
    /// Dead slots are reused oldest first; their generation was advanced when
    /// the previous occupant was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityCapacityExhausted`] when every slot is live.
    pub fn create_entity(&mut self) -> EcsResult<EntityHandle> {
        let index = if let Some(index) = self.free_list.pop_front() {
            trace!(index, "recycling entity slot");
            index
        } else if self.slots.len() < self.config.max_entities as usize {
            self.slots.push(EntitySlot::default());
            self.signatures.push(Signature::EMPTY);
            (self.slots.len() - 1) as EntityIndex
        } else {
            warn!(capacity = self.config.max_entities, "entity capacity exhausted");
            return Err(EcsError::EntityCapacityExhausted {
                capacity: self.config.max_entities,
            });
        };

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        let handle = EntityHandle::new(index, slot.generation);
        self.signatures[index as usize].clear();
        self.alive_count += 1;

        // Systems with an empty requirement match every entity
        self.refresh_systems(index as usize);
        Ok(handle)
    }

    /// Deletes an entity and every component it owns.
    ///
    /// Returns `false` if `handle` is stale.
    pub fn delete_entity(&mut self, handle: EntityHandle) -> bool {
        let Ok(idx) = self.check(handle) else {
            warn!(%handle, "delete_entity on stale handle");
            return false;
        };
        let index = handle.index();

        for store in &mut self.stores {
            store.on_entity_destroyed(index);
        }
        for entry in &mut self.systems {
            entry.forget(index);
        }

        self.signatures[idx].clear();
        let slot = &mut self.slots[idx];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push_back(index);
        self.alive_count -= 1;
        true
    }

    /// Deletes every live entity, keeping type and system registrations.
    ///
    /// Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        let components: usize = self.stores.iter().map(|store| store.len()).sum();
        for store in &mut self.stores {
            store.clear();
        }
        for entry in &mut self.systems {
            entry.clear();
        }

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.alive {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push_back(idx as EntityIndex);
            }
            self.signatures[idx].clear();
        }

        debug!(
            entities = self.alive_count,
            components, "cleared entity registry"
        );
        self.alive_count = 0;
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Size of the slot table.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.config.max_entities
    }

    /// Iterates over the handles of every live entity in slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.alive
                .then(|| EntityHandle::new(idx as EntityIndex, slot.generation))
        })
    }

    /// Signature of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleHandle`] if `handle` is not current.
    pub fn signature_of(&self, handle: EntityHandle) -> EcsResult<Signature> {
        let idx = self.check(handle)?;
        Ok(self.signatures[idx])
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `value` to the entity, overwriting any existing `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleHandle`] or
    /// [`EcsError::UnregisteredComponentType`]; the registry is unchanged.
    pub fn add_component<T: Component>(&mut self, handle: EntityHandle, value: T) -> EcsResult<()> {
        let idx = self.check(handle).map_err(|e| {
            warn!(component = type_name::<T>(), "add_component rejected: {e}");
            e
        })?;
        let id = self.types.require::<T>().map_err(|e| {
            warn!(%handle, "add_component rejected: {e}");
            e
        })?;

        self.store_mut::<T>(id)?.insert(handle.index(), value);

        let signature = &mut self.signatures[idx];
        if !signature.contains(id) {
            signature.insert(id);
            self.refresh_systems(idx);
        }
        Ok(())
    }

    /// Detaches the entity's `T`.
    ///
    /// Returns `Ok(false)` if the entity had no `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleHandle`] or
    /// [`EcsError::UnregisteredComponentType`].
    pub fn remove_component<T: Component>(&mut self, handle: EntityHandle) -> EcsResult<bool> {
        Ok(self.take_component::<T>(handle)?.is_some())
    }

    /// Detaches and returns the entity's `T`, if it had one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleHandle`] or
    /// [`EcsError::UnregisteredComponentType`].
    pub fn take_component<T: Component>(&mut self, handle: EntityHandle) -> EcsResult<Option<T>> {
        let idx = self.check(handle).map_err(|e| {
            warn!(component = type_name::<T>(), "remove_component rejected: {e}");
            e
        })?;
        let id = self.types.require::<T>().map_err(|e| {
            warn!(%handle, "remove_component rejected: {e}");
            e
        })?;

        let taken = self.store_mut::<T>(id)?.take(handle.index());
        if taken.is_some() {
            self.signatures[idx].remove(id);
            self.refresh_systems(idx);
        }
        Ok(taken)
    }

    /// Gets the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleHandle`], [`EcsError::UnregisteredComponentType`]
    /// or [`EcsError::ComponentNotFound`].
    pub fn get_component<T: Component>(&self, handle: EntityHandle) -> EcsResult<&T> {
        self.check(handle)?;
        let id = self.types.require::<T>()?;
        self.store_ref::<T>(id)?
            .get(handle.index())
            .ok_or(EcsError::ComponentNotFound {
                index: handle.index(),
                type_name: type_name::<T>(),
            })
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// Same as [`get_component`](Self::get_component).
    pub fn get_component_mut<T: Component>(&mut self, handle: EntityHandle) -> EcsResult<&mut T> {
        self.check(handle)?;
        let id = self.types.require::<T>()?;
        self.store_mut::<T>(id)?
            .get_mut(handle.index())
            .ok_or(EcsError::ComponentNotFound {
                index: handle.index(),
                type_name: type_name::<T>(),
            })
    }

    /// Gets the entity's `T`, or `None` for any failure.
    ///
    /// For optional components where absence is routine.
    #[must_use]
    pub fn try_get_component<T: Component>(&self, handle: EntityHandle) -> Option<&T> {
        self.get_component(handle).ok()
    }

    /// Returns true if the entity is current and owns a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, handle: EntityHandle) -> bool {
        match (self.check(handle), self.types.id_of::<T>()) {
            (Ok(idx), Some(id)) => self.signatures[idx].contains(id),
            _ => false,
        }
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers a system and seeds its cache from the live entities.
    ///
    /// Systems are dispatched in registration order.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`System::required_signature`].
    pub fn register_system<S: System + 'static>(&mut self, system: S) -> EcsResult<SystemId> {
        let required = system.required_signature(self)?;
        let mut entry = SystemEntry::new(Box::new(system), required);

        for (idx, slot) in self.slots.iter().enumerate() {
            if slot.alive {
                let handle = EntityHandle::new(idx as EntityIndex, slot.generation);
                entry.refresh(handle, &self.signatures[idx]);
            }
        }

        let id = SystemId(self.systems.len());
        debug!(
            system = %entry.name,
            required = ?required,
            matching = entry.matching.len(),
            "registered system"
        );
        self.systems.push(entry);
        Ok(id)
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Ids of every registered system, in dispatch order.
    pub fn system_ids(&self) -> impl Iterator<Item = SystemId> {
        (0..self.systems.len()).map(SystemId)
    }

    /// The fixed requirement of a system.
    #[must_use]
    pub fn system_signature(&self, id: SystemId) -> Option<Signature> {
        self.systems.get(id.0).map(|entry| entry.required)
    }

    /// Current matching-entity cache of a system.
    #[must_use]
    pub fn matching_entities(&self, id: SystemId) -> Option<&[EntityHandle]> {
        self.systems.get(id.0).map(|entry| entry.matching.values())
    }

    /// Re-evaluates one entity against every system.
    fn refresh_systems(&mut self, idx: usize) {
        let handle = EntityHandle::new(idx as EntityIndex, self.slots[idx].generation);
        let signature = self.signatures[idx];
        for entry in &mut self.systems {
            if entry.refresh(handle, &signature) {
                trace!(system = %entry.name, %handle, "system interest changed");
            }
        }
    }

    /// Runs every system's update once, in registration order.
    ///
    /// Each system receives a snapshot of its cache. Mutations a system makes
    /// are reflected in every cache immediately, so later systems in the same
    /// frame see them.
    pub fn update_systems(&mut self) {
        let mut buffer = std::mem::take(&mut self.dispatch_buffer);

        for i in 0..self.systems.len() {
            let entry = &mut self.systems[i];
            // Skip a system that is already running (re-entrant dispatch)
            let Some(mut system) = entry.system.take() else {
                continue;
            };
            buffer.clear();
            buffer.extend_from_slice(entry.matching.values());
            trace!(system = %entry.name, entities = buffer.len(), "dispatching system");

            system.update(self, &buffer);

            self.systems[i].system = Some(system);
        }

        buffer.clear();
        self.dispatch_buffer = buffer;
    }
}

/// Builds the error for a store that failed to downcast to `T`.
#[cold]
fn type_mismatch<T: Component>(found: &'static str) -> EcsError {
    error!(expected = type_name::<T>(), found, "component store type mismatch");
    debug_assert!(
        found == type_name::<T>(),
        "store for {} holds {found}",
        type_name::<T>()
    );
    EcsError::TypeMismatchOnCast(type_name::<T>())
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Position(f32, f32, f32);

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Velocity(f32, f32, f32);

    struct Tag;

    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        registry.register_component_type::<Position>().unwrap();
        registry.register_component_type::<Velocity>().unwrap();
        registry
    }

    #[derive(Default)]
    struct Counter {
        frames: usize,
        seen: usize,
    }

    struct CountingSystem(std::rc::Rc<std::cell::RefCell<Counter>>);

    impl System for CountingSystem {
        fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature> {
            registry.signature_for::<(Position, Velocity)>()
        }

        fn update(&mut self, _registry: &mut EntityRegistry, entities: &[EntityHandle]) {
            let mut counter = self.0.borrow_mut();
            counter.frames += 1;
            counter.seen += entities.len();
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.alive_count(), 0);
        assert_eq!(registry.system_count(), 0);
        assert_eq!(registry.capacity(), 4096);
    }

    #[test]
    fn test_create_delete() {
        let mut registry = registry();
        let a = registry.create_entity().unwrap();
        let b = registry.create_entity().unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.alive_count(), 2);

        assert!(registry.delete_entity(a));
        assert!(!registry.is_current(a));
        assert!(!registry.delete_entity(a));
        assert_eq!(registry.alive_count(), 1);
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let mut registry = registry();
        let e1 = registry.create_entity().unwrap();
        registry.delete_entity(e1);
        let e2 = registry.create_entity().unwrap();

        assert_eq!(e2.index(), e1.index());
        assert_eq!(e2.generation(), e1.generation() + 1);
        assert!(registry.is_current(e2));
        assert!(!registry.is_current(e1));
    }

    #[test]
    fn test_entity_capacity() {
        let config = RegistryConfig {
            max_entities: 2,
            ..RegistryConfig::default()
        };
        let mut registry = EntityRegistry::with_config(config).unwrap();
        let a = registry.create_entity().unwrap();
        registry.create_entity().unwrap();
        assert_eq!(
            registry.create_entity(),
            Err(EcsError::EntityCapacityExhausted { capacity: 2 })
        );

        registry.delete_entity(a);
        assert!(registry.create_entity().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RegistryConfig {
            store_growth_factor: 1.0,
            ..RegistryConfig::default()
        };
        assert!(matches!(
            EntityRegistry::with_config(config),
            Err(EcsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_component_roundtrip() {
        let mut registry = registry();
        let e = registry.create_entity().unwrap();

        registry.add_component(e, Position(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(registry.get_component::<Position>(e), Ok(&Position(1.0, 2.0, 3.0)));
        assert!(registry.has_component::<Position>(e));
        assert!(!registry.has_component::<Velocity>(e));

        registry.get_component_mut::<Position>(e).unwrap().0 = 9.0;
        assert_eq!(registry.get_component::<Position>(e).unwrap().0, 9.0);

        assert_eq!(registry.remove_component::<Position>(e), Ok(true));
        assert_eq!(registry.remove_component::<Position>(e), Ok(false));
        assert!(matches!(
            registry.get_component::<Position>(e),
            Err(EcsError::ComponentNotFound { .. })
        ));
        assert!(registry.try_get_component::<Position>(e).is_none());
    }

    #[test]
    fn test_unregistered_type() {
        let mut registry = registry();
        let e = registry.create_entity().unwrap();

        assert!(matches!(
            registry.add_component(e, Tag),
            Err(EcsError::UnregisteredComponentType(_))
        ));
        assert!(matches!(
            registry.get_component::<Tag>(e),
            Err(EcsError::UnregisteredComponentType(_))
        ));
        assert!(registry.signature_of(e).unwrap().is_empty());
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut registry = registry();
        let e = registry.create_entity().unwrap();
        registry.delete_entity(e);

        let stale = Err(EcsError::StaleHandle {
            index: e.index(),
            generation: e.generation(),
        });
        assert_eq!(registry.add_component(e, Position::default()), stale);
        assert_eq!(registry.get_component::<Position>(e).map(|_| ()), stale);
        assert_eq!(registry.remove_component::<Position>(e).map(|_| ()), stale);
        assert_eq!(registry.signature_of(e).map(|_| ()), stale);
    }

    #[test]
    fn test_delete_sweeps_components() {
        let mut registry = registry();
        let e1 = registry.create_entity().unwrap();
        let e2 = registry.create_entity().unwrap();
        registry.add_component(e1, Position::default()).unwrap();
        registry.add_component(e1, Velocity::default()).unwrap();
        registry.add_component(e2, Position(5.0, 0.0, 0.0)).unwrap();

        registry.delete_entity(e1);
        assert_eq!(registry.store::<Position>().unwrap().len(), 1);
        assert_eq!(registry.store::<Velocity>().unwrap().len(), 0);

        // Recycled slot starts with nothing attached
        let e3 = registry.create_entity().unwrap();
        assert_eq!(e3.index(), e1.index());
        assert!(registry.signature_of(e3).unwrap().is_empty());
        assert!(registry.try_get_component::<Position>(e3).is_none());
        assert_eq!(registry.get_component::<Position>(e2).unwrap().0, 5.0);
    }

    #[test]
    fn test_system_cache_tracks_signature() {
        let mut registry = registry();
        let counter = std::rc::Rc::new(std::cell::RefCell::new(Counter::default()));
        let system = registry.register_system(CountingSystem(counter.clone())).unwrap();

        let e = registry.create_entity().unwrap();
        registry.add_component(e, Position::default()).unwrap();
        assert!(registry.matching_entities(system).unwrap().is_empty());

        registry.add_component(e, Velocity::default()).unwrap();
        assert_eq!(registry.matching_entities(system).unwrap(), &[e]);

        registry.update_systems();
        assert_eq!(counter.borrow().frames, 1);
        assert_eq!(counter.borrow().seen, 1);

        registry.remove_component::<Velocity>(e).unwrap();
        assert!(registry.matching_entities(system).unwrap().is_empty());

        registry.add_component(e, Velocity::default()).unwrap();
        registry.delete_entity(e);
        assert!(registry.matching_entities(system).unwrap().is_empty());
    }

    #[test]
    fn test_register_system_seeds_cache() {
        let mut registry = registry();
        let e = registry.create_entity().unwrap();
        registry.add_component(e, Position::default()).unwrap();
        registry.add_component(e, Velocity::default()).unwrap();
        let other = registry.create_entity().unwrap();
        registry.add_component(other, Position::default()).unwrap();

        let counter = std::rc::Rc::new(std::cell::RefCell::new(Counter::default()));
        let system = registry.register_system(CountingSystem(counter)).unwrap();
        assert_eq!(registry.matching_entities(system).unwrap(), &[e]);
        assert_eq!(
            registry.system_signature(system),
            registry.signature_for::<(Position, Velocity)>().ok()
        );
    }

    #[test]
    fn test_clear() {
        let mut registry = registry();
        for _ in 0..5 {
            let e = registry.create_entity().unwrap();
            registry.add_component(e, Position::default()).unwrap();
        }
        registry.clear();
        assert_eq!(registry.alive_count(), 0);
        assert!(registry.store::<Position>().unwrap().is_empty());
        assert_eq!(registry.component_type_count(), 2);
        assert_eq!(registry.entities().count(), 0);
    }

    #[test]
    fn test_clear_invalidates_handles_and_caches() {
        let mut registry = registry();
        let system = registry
            .register_system(CountingSystem(std::rc::Rc::default()))
            .unwrap();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let e = registry.create_entity().unwrap();
                registry.add_component(e, Position::default()).unwrap();
                registry.add_component(e, Velocity::default()).unwrap();
                e
            })
            .collect();
        assert_eq!(registry.matching_entities(system).unwrap().len(), 3);

        registry.clear();

        assert!(registry.matching_entities(system).unwrap().is_empty());
        for &handle in &handles {
            assert!(!registry.is_current(handle));
            assert!(matches!(
                registry.get_component::<Position>(handle),
                Err(EcsError::StaleHandle { .. })
            ));
        }

        // Slots come back oldest first with a new generation
        let reused = registry.create_entity().unwrap();
        assert_eq!(reused.index(), handles[0].index());
        assert_eq!(reused.generation(), handles[0].generation() + 1);
        assert!(registry.signature_of(reused).unwrap().is_empty());
        assert!(registry.matching_entities(system).unwrap().is_empty());

        // Caches keep working after a clear
        registry.add_component(reused, Position::default()).unwrap();
        registry.add_component(reused, Velocity::default()).unwrap();
        assert_eq!(registry.matching_entities(system).unwrap(), &[reused]);
    }

    #[test]
    fn test_component_info() {
        let registry = registry();
        let id = registry.component_type_id::<Velocity>().unwrap();
        let info = registry.component_info(id).unwrap();
        assert_eq!(info.id, id);
        assert!(info.name.ends_with("Velocity"));
    }

    #[test]
    fn test_unbounded_growth_config_rejected() {
        let config = RegistryConfig {
            initial_store_capacity: 1,
            store_growth_factor: f32::INFINITY,
            ..RegistryConfig::default()
        };
        assert!(matches!(
            EntityRegistry::with_config(config),
            Err(EcsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_stores_grow_from_small_capacity() {
        let config = RegistryConfig {
            max_entities: 64,
            initial_store_capacity: 1,
            store_growth_factor: 8.0,
        };
        let mut registry = EntityRegistry::with_config(config).unwrap();
        registry.register_component_type::<Position>().unwrap();
        for _ in 0..64 {
            let e = registry.create_entity().unwrap();
            registry.add_component(e, Position::default()).unwrap();
        }
        assert_eq!(registry.store::<Position>().unwrap().len(), 64);
    }
}
