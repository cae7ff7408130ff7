//! Constant downward acceleration.

use kiln_core::{EcsResult, EntityHandle, EntityRegistry, Signature, System};

use crate::components::{Collider, Velocity};

/// Terminal falling speed (units per second).
pub const TERMINAL_VELOCITY: f32 = 50.0;

/// Accelerates every body with a [`Velocity`] and [`Collider`] along Y.
///
/// Entities without a collider are treated as free-floating and are not
/// affected.
#[derive(Clone, Copy, Debug)]
pub struct GravitySystem {
    gravity: f32,
    dt: f32,
}

impl GravitySystem {
    /// Creates the system with acceleration `gravity` (negative is down) and
    /// a fixed step of `dt` seconds.
    #[must_use]
    pub const fn new(gravity: f32, dt: f32) -> Self {
        Self { gravity, dt }
    }
}

impl System for GravitySystem {
    fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature> {
        registry.signature_for::<(Velocity, Collider)>()
    }

    fn update(&mut self, registry: &mut EntityRegistry, entities: &[EntityHandle]) {
        for &entity in entities {
            if let Ok(velocity) = registry.get_component_mut::<Velocity>(entity) {
                velocity.y = (velocity.y + self.gravity * self.dt)
                    .clamp(-TERMINAL_VELOCITY, TERMINAL_VELOCITY);
            }
        }
    }

    fn name(&self) -> &str {
        "gravity"
    }
}
