//! # KILN Core Engine
//!
//! Entity/component storage and system dispatch:
//! - Generational entity handles over a fixed slot table
//! - Dense component stores with O(1) swap-remove
//! - 128-bit component signatures
//! - Systems fed from exact, registry-maintained entity caches
//!
//! ## Architecture Rules
//!
//! 1. **Handles, not references** - only `EntityHandle`s survive across calls
//! 2. **The registry owns everything** - stores, signatures and caches
//! 3. **Single-threaded** - one logical thread per registry
//!
//! ## Example
//!
//! ```rust
//! use kiln_core::{EntityRegistry, EcsResult};
//!
//! #[derive(Debug, PartialEq)]
//! struct Position([f32; 3]);
//!
//! fn main() -> EcsResult<()> {
//!     let mut registry = EntityRegistry::new();
//!     registry.register_component_type::<Position>()?;
//!
//!     let entity = registry.create_entity()?;
//!     registry.add_component(entity, Position([0.0; 3]))?;
//!     assert_eq!(registry.get_component::<Position>(entity)?, &Position([0.0; 3]));
//!
//!     registry.delete_entity(entity);
//!     assert!(!registry.is_current(entity));
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{
    AnyComponentStore, Component, ComponentInfo, ComponentSet, ComponentStore, ComponentTypeId,
    EntityHandle, EntityIndex, EntityRegistry, FixedBitset128, Signature, System, SystemId,
    MAX_COMPONENT_TYPES,
};
pub use error::{EcsError, EcsResult};
