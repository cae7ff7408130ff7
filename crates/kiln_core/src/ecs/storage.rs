//! # Component Storage
//!
//! Dense, packed storage for a single component type.
//!
//! ```text
//! components:    [ C0, C1, C2 ]     packed, no holes
//! owner_of_slot: [ e3, e4, e1 ]     entity index owning each slot
//! sparse:        e1 -> 2, e3 -> 0, e4 -> 1
//! ```
//!
//! - Lookup is O(1) through the sparse reverse table
//! - Removal is O(1) swap-remove: the last slot moves into the hole
//! - Iteration walks contiguous memory
//!
//! Storage order is not stable across removals.

use std::any::{type_name, Any};

use super::component::Component;
use super::entity::EntityIndex;
use super::sparse::SparseIndex;
use crate::config::{MAX_STORE_GROWTH_FACTOR, MIN_STORE_GROWTH_FACTOR};

/// A store never holds more components than there are entity indices.
const MAX_STORE_LEN: usize = EntityIndex::MAX as usize;

/// Packed storage for components of type `T`.
///
/// # Example
///
/// ```rust,ignore
/// let mut store: ComponentStore<Position> = ComponentStore::new();
/// store.insert(7, Position::new(1.0, 2.0, 3.0));
/// assert!(store.remove(7));
/// ```
pub struct ComponentStore<T: Component> {
    /// Packed component values.
    components: Vec<T>,
    /// Entity index owning each packed slot.
    owner_of_slot: Vec<EntityIndex>,
    /// Entity index -> packed slot.
    sparse: SparseIndex,
    /// Capacity multiplier when full.
    growth_factor: f32,
}

impl<T: Component> ComponentStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, MIN_STORE_GROWTH_FACTOR)
    }

    /// Creates a store with pre-allocated room for `capacity` components.
    ///
    /// `growth_factor` is clamped to `1.5..=8.0`; NaN falls back to 1.5.
    #[must_use]
    pub fn with_capacity(capacity: usize, growth_factor: f32) -> Self {
        let growth_factor = if growth_factor.is_nan() {
            MIN_STORE_GROWTH_FACTOR
        } else {
            growth_factor.clamp(MIN_STORE_GROWTH_FACTOR, MAX_STORE_GROWTH_FACTOR)
        };
        Self {
            components: Vec::with_capacity(capacity),
            owner_of_slot: Vec::with_capacity(capacity),
            sparse: SparseIndex::new(),
            growth_factor,
        }
    }

    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the store holds no component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Allocated room in the packed arrays.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.components.capacity()
    }

    /// Grows the packed arrays by the growth factor (at least one slot).
    ///
    /// The target never exceeds one slot per possible entity index.
    fn grow(&mut self) {
        let capacity = self.components.capacity();
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let scaled = (capacity as f64 * f64::from(self.growth_factor)).ceil() as usize;
        let target = scaled
            .min(MAX_STORE_LEN)
            .max(capacity.saturating_add(1));
        let additional = target.saturating_sub(self.components.len());
        self.components.reserve_exact(additional);
        self.owner_of_slot.reserve_exact(additional);
    }

    /// Attaches `value` to `entity`.
    ///
    /// Overwrites in place if `entity` already has a component here,
    /// otherwise appends. Returns the previous value, if any.
    pub fn insert(&mut self, entity: EntityIndex, value: T) -> Option<T> {
        if let Some(slot) = self.sparse.get(entity) {
            return Some(std::mem::replace(&mut self.components[slot], value));
        }

        if self.components.len() == self.components.capacity() {
            self.grow();
        }
        self.sparse.set(entity, self.components.len());
        self.components.push(value);
        self.owner_of_slot.push(entity);
        None
    }

    /// Detaches and returns `entity`'s component.
    ///
    /// The last packed slot is moved into the freed slot.
    pub fn take(&mut self, entity: EntityIndex) -> Option<T> {
        let slot = self.sparse.get(entity)?;
        self.sparse.unset(entity);

        let value = self.components.swap_remove(slot);
        self.owner_of_slot.swap_remove(slot);
        if let Some(&moved) = self.owner_of_slot.get(slot) {
            self.sparse.set(moved, slot);
        }
        Some(value)
    }

    /// Removes `entity`'s component.
    ///
    /// Returns `false` if there was none; that is not an error.
    pub fn remove(&mut self, entity: EntityIndex) -> bool {
        self.take(entity).is_some()
    }

    /// Gets `entity`'s component.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: EntityIndex) -> Option<&T> {
        self.sparse.get(entity).map(|slot| &self.components[slot])
    }

    /// Gets `entity`'s component mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityIndex) -> Option<&mut T> {
        self.sparse.get(entity).map(|slot| &mut self.components[slot])
    }

    /// Returns true if `entity` has a component here.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityIndex) -> bool {
        self.sparse.get(entity).is_some()
    }

    /// Packed slot currently holding `entity`'s component.
    #[inline]
    #[must_use]
    pub fn slot_of(&self, entity: EntityIndex) -> Option<usize> {
        self.sparse.get(entity)
    }

    /// Removes `entity`'s component if present.
    pub fn on_entity_destroyed(&mut self, entity: EntityIndex) {
        self.remove(entity);
    }

    /// Packed components.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.components
    }

    /// Packed components, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Owning entity index of each packed slot.
    #[inline]
    #[must_use]
    pub fn owners(&self) -> &[EntityIndex] {
        &self.owner_of_slot
    }

    /// Iterates over `(entity index, component)` pairs in packed order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &T)> {
        self.owner_of_slot.iter().copied().zip(self.components.iter())
    }

    /// Iterates mutably over `(entity index, component)` pairs in packed order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityIndex, &mut T)> {
        self.owner_of_slot
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }

    /// Removes every component, keeping the allocation.
    pub fn clear(&mut self) {
        self.components.clear();
        self.owner_of_slot.clear();
        self.sparse.clear();
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`].
///
/// Lets the registry keep stores of different types in one table and sweep
/// them when an entity is destroyed.
pub trait AnyComponentStore: Any {
    /// Removes the entity's component if present.
    fn on_entity_destroyed(&mut self, entity: EntityIndex);

    /// Number of live components.
    fn len(&self) -> usize;

    /// Returns true if the store holds no component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every component.
    fn clear(&mut self);

    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Converts to Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts to mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponentStore for ComponentStore<T> {
    fn on_entity_destroyed(&mut self, entity: EntityIndex) {
        ComponentStore::on_entity_destroyed(self, entity);
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn clear(&mut self) {
        ComponentStore::clear(self);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
