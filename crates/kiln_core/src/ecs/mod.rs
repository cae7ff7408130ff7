//! # Entity Component System
//!
//! A generational-handle ECS with signature-filtered system dispatch.
//!
//! ## Design Philosophy
//!
//! - Entities are slot indices with generation counters
//! - Components live in dense per-type arrays
//! - A 128-bit signature per entity records which types it owns
//! - Systems are fed from caches the registry keeps exact

mod bitset;
mod component;
mod entity;
mod registry;
mod signature;
mod sparse;
mod storage;
mod system;

pub use bitset::{FixedBitset128, IterOnes};
pub use component::{Component, ComponentInfo, ComponentTypeId, ComponentTypes, MAX_COMPONENT_TYPES};
pub use entity::{EntityHandle, EntityIndex};
pub use registry::{EntityRegistry, SystemId};
pub use signature::{ComponentSet, Signature};
pub use storage::{AnyComponentStore, ComponentStore};
pub use system::System;
