//! Velocity integration.

use kiln_core::{EcsResult, EntityHandle, EntityRegistry, Signature, System};

use crate::components::{Transform, Velocity};

/// Moves every entity with a [`Transform`] and [`Velocity`] by one fixed step.
#[derive(Clone, Copy, Debug)]
pub struct MovementSystem {
    dt: f32,
}

impl MovementSystem {
    /// Creates the system for a fixed step of `dt` seconds.
    #[must_use]
    pub const fn new(dt: f32) -> Self {
        Self { dt }
    }
}

impl System for MovementSystem {
    fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature> {
        registry.signature_for::<(Transform, Velocity)>()
    }

    fn update(&mut self, registry: &mut EntityRegistry, entities: &[EntityHandle]) {
        for &entity in entities {
            let Ok(&velocity) = registry.get_component::<Velocity>(entity) else {
                continue;
            };
            if let Ok(transform) = registry.get_component_mut::<Transform>(entity) {
                transform.position[0] += velocity.x * self.dt;
                transform.position[1] += velocity.y * self.dt;
                transform.position[2] += velocity.z * self.dt;
            }
        }
    }

    fn name(&self) -> &str {
        "movement"
    }
}
