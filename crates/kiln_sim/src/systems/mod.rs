//! # Simulation Systems
//!
//! Registered in this order by [`Simulation`](crate::Simulation):
//!
//! 1. [`GravitySystem`] - accelerates falling bodies
//! 2. [`MovementSystem`] - integrates velocity into position
//! 3. [`GroundContactSystem`] - resolves contact with the ground plane

mod gravity;
mod ground;
mod movement;

pub use gravity::{GravitySystem, TERMINAL_VELOCITY};
pub use ground::GroundContactSystem;
pub use movement::MovementSystem;
