//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the registry's slot table
//! - A generation counter for safe reuse

use std::fmt;

/// Index of an entity slot.
pub type EntityIndex = u32;

/// Opaque reference to an entity.
///
/// A handle is *current* while its generation matches the generation stored
/// in its slot. Deleting the entity advances the slot's generation, so every
/// handle issued before the deletion becomes stale, including after the slot
/// has been reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    index: EntityIndex,
    generation: u32,
}

impl EntityHandle {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: EntityIndex, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> EntityIndex {
        self.index
    }

    /// Returns the generation of this handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a single `u64` (generation in the upper half).
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Unpacks a handle produced by [`to_bits`](Self::to_bits).
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// One row of the registry's slot table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EntitySlot {
    /// Generation of the current (or next) occupant.
    pub(crate) generation: u32,
    /// Whether the slot currently holds a live entity.
    pub(crate) alive: bool,
}
