//! # Simulation Components
//!
//! Plain-data components shared with the rendering and physics layers.
//! All of them are `Pod` so collaborators can upload or copy them as bytes.

use bytemuck::{Pod, Zeroable};

/// Spatial placement of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// World-space position.
    pub position: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
    /// Rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
}

impl Transform {
    /// Creates an unrotated, unit-scale transform at `position`.
    #[inline]
    #[must_use]
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            scale: 1.0,
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Returns the squared distance to another transform's position.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        let dz = self.position[2] - other.position[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(0.0, 0.0, 0.0)
    }
}

/// Linear velocity in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X velocity component.
    pub x: f32,
    /// Y velocity component.
    pub y: f32,
    /// Z velocity component.
    pub z: f32,
    /// Padding for alignment.
    pub _padding: f32,
}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            _padding: 0.0,
        }
    }
}

/// Reference to a mesh and material owned by the asset layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct MeshRef {
    /// Mesh id in the asset cache.
    pub mesh_id: u32,
    /// Material id in the asset cache.
    pub material_id: u32,
}

/// Axis-aligned box collider centred on the transform.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Collider {
    /// Half size along each axis.
    pub half_extents: [f32; 3],
    /// Fraction of vertical speed kept when bouncing (0 = stop, 1 = elastic).
    pub restitution: f32,
}

impl Collider {
    /// A cube collider with the given half size.
    #[inline]
    #[must_use]
    pub const fn cube(half_size: f32, restitution: f32) -> Self {
        Self {
            half_extents: [half_size; 3],
            restitution,
        }
    }

    /// Lowest point of the collider when centred at `transform`.
    #[inline]
    #[must_use]
    pub fn bottom(&self, transform: &Transform) -> f32 {
        transform.position[1] - self.half_extents[1] * transform.scale
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::cube(0.5, 0.0)
    }
}
