//! # Signatures
//!
//! A signature records which component types an entity owns, or which types
//! a system requires. Bit *i* corresponds to [`ComponentTypeId`] *i*.

use std::ops::{BitAnd, BitOr};

use bytemuck::{Pod, Zeroable};

use super::bitset::FixedBitset128;
use super::component::{Component, ComponentTypeId, ComponentTypes};
use crate::error::EcsResult;

/// Set of component types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Signature(FixedBitset128);

impl Signature {
    /// The empty signature.
    pub const EMPTY: Self = Self(FixedBitset128::EMPTY);

    /// Creates an empty signature.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Builds a signature from a list of type ids.
    #[must_use]
    pub fn from_ids(ids: &[ComponentTypeId]) -> Self {
        let mut signature = Self::new();
        for &id in ids {
            signature.insert(id);
        }
        signature
    }

    /// Returns whether `id` is part of the signature.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.0.get(id.index())
    }

    /// Adds `id` to the signature.
    #[inline]
    pub fn insert(&mut self, id: ComponentTypeId) {
        self.0.set(id.index(), true);
    }

    /// Removes `id` from the signature.
    #[inline]
    pub fn remove(&mut self, id: ComponentTypeId) {
        self.0.set(id.index(), false);
    }

    /// Removes every type.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns true if this signature includes every type in `required`.
    ///
    /// This is the system matching rule: `(self AND required) == required`.
    #[inline]
    #[must_use]
    pub fn matches(&self, required: &Self) -> bool {
        self.0.is_superset_of(&required.0)
    }

    /// Returns true if no type is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of types in the signature.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// The underlying bitset.
    #[inline]
    #[must_use]
    pub const fn bits(&self) -> &FixedBitset128 {
        &self.0
    }
}

impl From<FixedBitset128> for Signature {
    fn from(bits: FixedBitset128) -> Self {
        Self(bits)
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A tuple of component types that can be turned into a [`Signature`].
///
/// Implemented for tuples of one to eight components.
///
/// ```rust,ignore
/// let required = registry.signature_for::<(Transform, Velocity)>()?;
/// ```
pub trait ComponentSet {
    /// Combines the ids of every type in the set.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponentType`](crate::EcsError::UnregisteredComponentType)
    /// for the first type that was never registered.
    fn signature(types: &ComponentTypes) -> EcsResult<Signature>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn signature(types: &ComponentTypes) -> EcsResult<Signature> {
                let mut signature = Signature::new();
                $(signature.insert(types.require::<$name>()?);)+
                Ok(signature)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcsError;

    struct Position;
    struct Velocity;
    struct Health;

    fn types() -> (ComponentTypes, ComponentTypeId, ComponentTypeId) {
        let mut types = ComponentTypes::new();
        let (pos, _) = types.register::<Position>().unwrap();
        let (vel, _) = types.register::<Velocity>().unwrap();
        (types, pos, vel)
    }

    #[test]
    fn test_insert_remove() {
        let (_, pos, vel) = types();
        let mut signature = Signature::new();
        signature.insert(pos);
        assert!(signature.contains(pos));
        assert!(!signature.contains(vel));
        assert_eq!(signature.len(), 1);

        signature.remove(pos);
        assert!(signature.is_empty());
    }

    #[test]
    fn test_matching_ignores_extra_components() {
        let (_, pos, vel) = types();
        let required = Signature::from_ids(&[pos]);
        let entity = Signature::from_ids(&[pos, vel]);

        assert!(entity.matches(&required));
        assert!(!required.matches(&entity));
        assert!(entity.matches(&Signature::EMPTY));
    }

    #[test]
    fn test_component_set() {
        let (types, pos, vel) = types();
        let signature = <(Position, Velocity)>::signature(&types).unwrap();
        assert_eq!(signature, Signature::from_ids(&[pos, vel]));
        assert_eq!(<(Velocity,)>::signature(&types).unwrap(), Signature::from_ids(&[vel]));
    }

    #[test]
    fn test_component_set_unregistered() {
        let (types, _, _) = types();
        let err = <(Position, Health)>::signature(&types).unwrap_err();
        assert!(matches!(err, EcsError::UnregisteredComponentType(name) if name.ends_with("Health")));
    }
}
