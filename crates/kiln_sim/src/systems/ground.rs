//! Ground plane contact.

use kiln_core::{EcsResult, EntityHandle, EntityRegistry, Signature, System};

use crate::components::{Collider, Transform, Velocity};

/// Vertical speeds below this after a bounce are zeroed.
const REST_SPEED: f32 = 0.05;

/// Keeps colliders above a horizontal ground plane.
///
/// A body that sinks below the plane is lifted onto it; if it was moving
/// down, its vertical speed is reflected and scaled by the collider's
/// restitution.
#[derive(Clone, Copy, Debug)]
pub struct GroundContactSystem {
    ground_height: f32,
}

impl GroundContactSystem {
    /// Creates the system for a ground plane at `ground_height`.
    #[must_use]
    pub const fn new(ground_height: f32) -> Self {
        Self { ground_height }
    }
}

impl System for GroundContactSystem {
    fn required_signature(&self, registry: &EntityRegistry) -> EcsResult<Signature> {
        registry.signature_for::<(Transform, Velocity, Collider)>()
    }

    fn update(&mut self, registry: &mut EntityRegistry, entities: &[EntityHandle]) {
        for &entity in entities {
            let Ok(&collider) = registry.get_component::<Collider>(entity) else {
                continue;
            };
            let Ok(transform) = registry.get_component_mut::<Transform>(entity) else {
                continue;
            };

            let penetration = self.ground_height - collider.bottom(transform);
            if penetration <= 0.0 {
                continue;
            }
            transform.position[1] += penetration;

            if let Ok(velocity) = registry.get_component_mut::<Velocity>(entity) {
                if velocity.y < 0.0 {
                    velocity.y = -velocity.y * collider.restitution;
                    if velocity.y < REST_SPEED {
                        velocity.y = 0.0;
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "ground_contact"
    }
}
