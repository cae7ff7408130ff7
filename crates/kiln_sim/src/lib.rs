//! # KILN SIM
//!
//! A small fixed-step simulation built on [`kiln_core`]:
//!
//! - [`components`] - plain-data `Transform`, `Velocity`, `MeshRef`, `Collider`
//! - [`systems`] - gravity, movement and ground contact
//! - [`Simulation`] - owns the registry and turns elapsed time into ticks
//!
//! ```rust
//! use kiln_sim::{Collider, Simulation, SimulationConfig, Transform, Velocity};
//!
//! let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
//! let ball = sim
//!     .spawn_body(Transform::at(0.0, 10.0, 0.0), Velocity::default(), Collider::default())
//!     .unwrap();
//!
//! sim.advance(0.5);
//! let height = sim.registry().get_component::<Transform>(ball).unwrap().position[1];
//! assert!(height < 10.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod components;
pub mod simulation;
pub mod systems;

pub use components::{Collider, MeshRef, Transform, Velocity};
pub use simulation::{Simulation, SimulationConfig};
pub use systems::{GravitySystem, GroundContactSystem, MovementSystem, TERMINAL_VELOCITY};
