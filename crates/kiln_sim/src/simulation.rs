//! # Fixed-Step Simulation
//!
//! Drives an [`EntityRegistry`] at a fixed tick rate. Wall-clock time is fed
//! in through [`Simulation::advance`] and converted into whole ticks; each
//! tick dispatches every system once.
//!
//! ```toml
//! tick_rate_hz = 60
//! gravity = -9.81
//! ground_height = 0.0
//! max_catch_up_steps = 8
//!
//! [registry]
//! max_entities = 4096
//! ```

use std::path::Path;

use kiln_core::{EcsError, EcsResult, EntityHandle, EntityRegistry, RegistryConfig};
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::components::{Collider, MeshRef, Transform, Velocity};
use crate::systems::{GravitySystem, GroundContactSystem, MovementSystem};

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Ticks per simulated second.
    pub tick_rate_hz: u32,
    /// Vertical acceleration in units per second squared.
    pub gravity: f32,
    /// Height of the ground plane.
    pub ground_height: f32,
    /// Most ticks a single [`Simulation::advance`] call may run.
    pub max_catch_up_steps: u32,
    /// Sizing of the underlying registry.
    pub registry: RegistryConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            gravity: -9.81,
            ground_height: 0.0,
            max_catch_up_steps: 8,
            registry: RegistryConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the document does not parse or
    /// fails validation.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] on I/O, parse or validation
    /// failure.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges, including the nested registry section.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> EcsResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(EcsError::InvalidConfig(
                "tick_rate_hz must be greater than zero".into(),
            ));
        }
        if self.max_catch_up_steps == 0 {
            return Err(EcsError::InvalidConfig(
                "max_catch_up_steps must be greater than zero".into(),
            ));
        }
        if !self.gravity.is_finite() || !self.ground_height.is_finite() {
            return Err(EcsError::InvalidConfig(
                "gravity and ground_height must be finite".into(),
            ));
        }
        self.registry.validate()
    }

    /// Length of one tick in seconds.
    #[inline]
    #[must_use]
    pub fn fixed_dt(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz)
    }
}

/// A registry plus the fixed-step clock that drives its systems.
pub struct Simulation {
    registry: EntityRegistry,
    config: SimulationConfig,
    tick: u64,
    /// Unsimulated time carried between `advance` calls, in seconds.
    accumulator: f64,
}

impl Simulation {
    /// Builds a simulation with the component types and systems registered.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SimulationConfig) -> EcsResult<Self> {
        config.validate()?;
        let mut registry = EntityRegistry::with_config(config.registry.clone())?;

        registry.register_component_type::<Transform>()?;
        registry.register_component_type::<Velocity>()?;
        registry.register_component_type::<Collider>()?;
        registry.register_component_type::<MeshRef>()?;

        let dt = config.fixed_dt() as f32;
        registry.register_system(GravitySystem::new(config.gravity, dt))?;
        registry.register_system(MovementSystem::new(dt))?;
        registry.register_system(GroundContactSystem::new(config.ground_height))?;

        debug!(
            tick_rate_hz = config.tick_rate_hz,
            gravity = config.gravity,
            systems = registry.system_count(),
            "simulation ready"
        );

        Ok(Self {
            registry,
            config,
            tick: 0,
            accumulator: 0.0,
        })
    }

    /// The configuration this simulation was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read access to the underlying registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Write access to the underlying registry.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Ticks run so far.
    #[inline]
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds elapsed.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ticks = self.tick as f64;
        ticks * self.config.fixed_dt()
    }

    /// Spawns a dynamic body affected by gravity and ground contact.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityCapacityExhausted`] when the registry is
    /// full. No partial entity is left behind on failure.
    pub fn spawn_body(
        &mut self,
        transform: Transform,
        velocity: Velocity,
        collider: Collider,
    ) -> EcsResult<EntityHandle> {
        let entity = self.registry.create_entity()?;
        let attached = self
            .registry
            .add_component(entity, transform)
            .and_then(|()| self.registry.add_component(entity, velocity))
            .and_then(|()| self.registry.add_component(entity, collider));
        if let Err(e) = attached {
            self.registry.delete_entity(entity);
            return Err(e);
        }
        trace!(%entity, "spawned body");
        Ok(entity)
    }

    /// Spawns a static, renderable entity that no system moves.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityCapacityExhausted`] when the registry is
    /// full.
    pub fn spawn_static(&mut self, transform: Transform, mesh: MeshRef) -> EcsResult<EntityHandle> {
        let entity = self.registry.create_entity()?;
        let attached = self
            .registry
            .add_component(entity, transform)
            .and_then(|()| self.registry.add_component(entity, mesh));
        if let Err(e) = attached {
            self.registry.delete_entity(entity);
            return Err(e);
        }
        Ok(entity)
    }

    /// Destroys an entity. Returns false if the handle is stale.
    pub fn despawn(&mut self, entity: EntityHandle) -> bool {
        self.registry.delete_entity(entity)
    }

    /// Runs exactly one tick.
    pub fn step(&mut self) {
        self.registry.update_systems();
        self.tick += 1;
        trace!(tick = self.tick, "tick complete");
    }

    /// Feeds `elapsed_secs` of wall-clock time and runs the ticks it covers.
    ///
    /// At most `max_catch_up_steps` ticks run per call; any backlog beyond
    /// that is dropped, including an infinite one. Non-positive or NaN input
    /// runs nothing.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_secs: f64) -> u32 {
        if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
            return 0;
        }

        let dt = self.config.fixed_dt();
        let budget = dt * f64::from(self.config.max_catch_up_steps);
        self.accumulator += elapsed_secs;

        if self.accumulator > budget {
            warn!(
                backlog_secs = self.accumulator,
                max_catch_up_steps = self.config.max_catch_up_steps,
                "simulation falling behind, dropping backlog"
            );
            self.accumulator = budget;
        }

        let mut ran = 0;
        while self.accumulator >= dt && ran < self.config.max_catch_up_steps {
            self.step();
            self.accumulator -= dt;
            ran += 1;
        }

        ran
    }
}
