//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Components: Particle, Position, Velocity, Lifetime
//! - Per frame: movement, lifetime decay, destroy and respawn of dead particles, maintenance
//!
//! This scenario tests:
//! - Whole-store iteration through component masks
//! - Handle validation and slot recycling under constant churn
//! - Lifecycle event delivery to a single listener

use std::{cell::Cell, rc::Rc};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rusty_substrate::ecs::{Entity, World, event::EntityRemoved};

use crate::components::{Lifetime, Particle, Position, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(StdRng);

impl ParticleFactory {
    fn create_particle(&mut self) -> (Particle, Position, Velocity, Lifetime) {
        let rng = &mut self.0;
        let pos = Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        };
        let vel = Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        };
        let lifetime = Lifetime {
            remaining: rng.gen_range(0.1..1.0),
            total: 1.0,
        };
        (Particle, pos, vel, lifetime)
    }
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
    factory: ParticleFactory,
    removed: Rc<Cell<usize>>,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            world: World::new(),
            factory: ParticleFactory(StdRng::seed_from_u64(config.seed)),
            removed: Rc::new(Cell::new(0)),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.world.len()
    }

    /// Number of particles that have died since setup.
    pub fn removed_count(&self) -> usize {
        self.removed.get()
    }

    /// Move every particle by its velocity.
    pub fn movement(&mut self) {
        let dt = self.config.delta_time;
        self.world
            .for_each::<(Position, Velocity)>(|world, entity| {
                let vel = *world.get_component::<Velocity>(entity);
                let pos = world.get_component_mut::<Position>(entity);
                pos.x += vel.x * dt;
                pos.y += vel.y * dt;
                pos.z += vel.z * dt;
            });
    }

    /// Age every particle and replace the dead ones.
    pub fn lifetime(&mut self) {
        let dt = self.config.delta_time;
        let mut dead: Vec<Entity> = Vec::new();
        self.world.for_each::<Lifetime>(|world, entity| {
            let lifetime = world.get_component_mut::<Lifetime>(entity);
            lifetime.remaining -= dt;
            if lifetime.remaining <= 0.0 {
                dead.push(entity);
            }
        });
        for entity in dead {
            self.world.destroy(entity);
            self.world.spawn(self.factory.create_particle());
        }
        self.world.maintain();
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        for _ in 0..self.config.particle_count {
            self.world.spawn(self.factory.create_particle());
        }
        let removed = Rc::clone(&self.removed);
        self.world
            .events()
            .subscribe(move |_: &EntityRemoved| removed.set(removed.get() + 1));
    }

    fn update(&mut self) {
        self.movement();
        self.lifetime();
    }

    fn teardown(&mut self) {
        for entity in self.world.entities() {
            self.world.destroy(entity);
        }
        self.world.maintain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_scenario_setup() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.current_count(), 100);

        scenario.teardown();
        assert_eq!(scenario.current_count(), 0);
    }

    #[test]
    fn particle_scenario_update() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        });
        scenario.setup();

        // Lifetimes are under a second, so a second of frames kills every original particle.
        for _ in 0..61 {
            scenario.update();
        }

        assert_eq!(scenario.current_count(), 100);
        assert!(scenario.removed_count() >= 100);

        scenario.teardown();
    }
}
