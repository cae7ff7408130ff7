//! Reverse lookup from entity index to dense position.
//!
//! ```text
//! sparse:  [ -, 2, -, 0, 1 ]     entity index -> dense position
//! dense:   [ 3, 4, 1 ]           dense position -> entity index
//! ```
//!
//! Both component stores and system caches keep a dense array of owners and
//! use this table to find an entity's position in O(1).

use super::entity::EntityIndex;

/// Marker for "entity has no dense position".
const VACANT: u32 = u32::MAX;

/// Sparse `entity index -> dense position` table.
#[derive(Clone, Debug, Default)]
pub(crate) struct SparseIndex {
    positions: Vec<u32>,
}

impl SparseIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Dense position of `entity`, if it has one.
    #[inline]
    pub(crate) fn get(&self, entity: EntityIndex) -> Option<usize> {
        match self.positions.get(entity as usize) {
            Some(&pos) if pos != VACANT => Some(pos as usize),
            _ => None,
        }
    }

    /// Records `entity` at dense position `pos`.
    #[inline]
    pub(crate) fn set(&mut self, entity: EntityIndex, pos: usize) {
        let idx = entity as usize;
        if idx >= self.positions.len() {
            self.positions.resize(idx + 1, VACANT);
        }
        self.positions[idx] = pos as u32;
    }

    /// Forgets `entity`'s dense position.
    #[inline]
    pub(crate) fn unset(&mut self, entity: EntityIndex) {
        if let Some(pos) = self.positions.get_mut(entity as usize) {
            *pos = VACANT;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
    }
}

/// Dense set of values keyed by entity index, with swap-remove deletion.
///
/// Iteration order is insertion order until the first removal; removals move
/// the last element into the freed position.
#[derive(Clone, Debug)]
pub(crate) struct DenseSet<V> {
    keys: Vec<EntityIndex>,
    values: Vec<V>,
    sparse: SparseIndex,
}

impl<V> Default for DenseSet<V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            sparse: SparseIndex::new(),
        }
    }
}

impl<V> DenseSet<V> {
    #[inline]
    pub(crate) fn contains(&self, key: EntityIndex) -> bool {
        self.sparse.get(key).is_some()
    }

    /// Inserts or overwrites the value for `key`.
    pub(crate) fn insert(&mut self, key: EntityIndex, value: V) {
        if let Some(pos) = self.sparse.get(key) {
            self.values[pos] = value;
        } else {
            self.sparse.set(key, self.keys.len());
            self.keys.push(key);
            self.values.push(value);
        }
    }

    /// Swap-removes the value for `key`.
    pub(crate) fn remove(&mut self, key: EntityIndex) -> Option<V> {
        let pos = self.sparse.get(key)?;
        self.sparse.unset(key);
        self.keys.swap_remove(pos);
        let value = self.values.swap_remove(pos);
        if let Some(&moved) = self.keys.get(pos) {
            self.sparse.set(moved, pos);
        }
        Some(value)
    }

    #[inline]
    pub(crate) fn values(&self) -> &[V] {
        &self.values
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.sparse.clear();
    }
}
