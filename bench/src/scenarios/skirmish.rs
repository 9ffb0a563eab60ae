//! Skirmish benchmark scenario.
//!
//! Two teams trade hits every frame. Attacks are raised as [`Hit`] events; a damage listener
//! queues them and the frame applies the queue, while a configurable number of passive listeners
//! (sound, UI, statistics in a real game) observe the same traffic.
//!
//! This scenario tests:
//! - Event fan-out to many subscribers of one type
//! - Component lookups by handle for targets picked at random
//! - Entity removal with lifecycle events once health runs out

use std::{cell::RefCell, rc::Rc};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rusty_substrate::ecs::{Entity, World};

use crate::components::{Health, Hit, Position, Team, Tick};
use crate::scenarios::Scenario;

/// Configuration for the skirmish benchmark.
#[derive(Clone)]
pub struct SkirmishConfig {
    /// Fighters per team.
    pub team_size: usize,
    /// Passive `Hit` listeners besides the damage listener.
    pub listeners: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            team_size: 1_000,
            listeners: 8,
            seed: 12345,
        }
    }
}

/// Skirmish benchmark scenario.
pub struct SkirmishScenario {
    config: SkirmishConfig,
    world: World,
    rng: StdRng,
    teams: [Vec<Entity>; 2],
    pending: Rc<RefCell<Vec<Hit>>>,
    observed: Rc<RefCell<u64>>,
    frame: u64,
}

impl SkirmishScenario {
    /// Create a new skirmish scenario with default config.
    pub fn new() -> Self {
        Self::with_config(SkirmishConfig::default())
    }

    /// Create a new skirmish scenario with custom config.
    pub fn with_config(config: SkirmishConfig) -> Self {
        Self {
            world: World::new(),
            rng: StdRng::seed_from_u64(config.seed),
            teams: [Vec::new(), Vec::new()],
            pending: Rc::new(RefCell::new(Vec::new())),
            observed: Rc::new(RefCell::new(0)),
            frame: 0,
            config,
        }
    }

    /// Number of fighters still alive.
    pub fn survivors(&self) -> usize {
        self.teams.iter().map(Vec::len).sum()
    }

    /// Determine if one side has been wiped out.
    pub fn is_over(&self) -> bool {
        self.teams.iter().any(Vec::is_empty)
    }

    /// Total deliveries seen by the passive listeners.
    pub fn observed(&self) -> u64 {
        *self.observed.borrow()
    }

    /// Every fighter attacks a random living enemy.
    pub fn attack(&mut self) {
        for side in 0..2 {
            let enemies = &self.teams[1 - side];
            if enemies.is_empty() {
                continue;
            }
            for &attacker in &self.teams[side] {
                let target = enemies[self.rng.gen_range(0..enemies.len())];
                let damage = self.rng.gen_range(1.0..10.0);
                self.world.events().raise(Hit {
                    attacker,
                    target,
                    damage,
                });
            }
        }
    }

    /// Apply queued hits and remove the fallen.
    pub fn resolve(&mut self) {
        let hits = std::mem::take(&mut *self.pending.borrow_mut());
        for hit in hits {
            if let Ok(health) = self.world.try_get_component_mut::<Health>(hit.target) {
                health.current -= hit.damage;
                if health.current <= 0.0 {
                    self.world.destroy(hit.target);
                }
            }
        }
        for team in &mut self.teams {
            team.retain(|fighter| self.world.is_valid(*fighter));
        }
        self.world.maintain();
    }
}

impl Default for SkirmishScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for SkirmishScenario {
    fn name(&self) -> &'static str {
        "skirmish"
    }

    fn entity_count(&self) -> usize {
        self.config.team_size * 2
    }

    fn setup(&mut self) {
        for (side, team) in self.teams.iter_mut().enumerate() {
            for i in 0..self.config.team_size {
                let fighter = self.world.spawn((
                    Team { id: side as u32 },
                    Position {
                        x: i as f32,
                        y: side as f32 * 100.0,
                        z: 0.0,
                    },
                    Health {
                        current: 100.0,
                        max: 100.0,
                    },
                ));
                team.push(fighter);
            }
        }

        let pending = Rc::clone(&self.pending);
        self.world
            .events()
            .subscribe(move |hit: &Hit| pending.borrow_mut().push(*hit));
        for _ in 0..self.config.listeners {
            let observed = Rc::clone(&self.observed);
            self.world
                .events()
                .subscribe(move |_: &Hit| *observed.borrow_mut() += 1);
        }
    }

    fn update(&mut self) {
        self.frame += 1;
        self.world.events().raise(Tick { frame: self.frame });
        self.attack();
        self.resolve();
    }

    fn teardown(&mut self) {
        for team in &mut self.teams {
            for fighter in team.drain(..) {
                self.world.destroy(fighter);
            }
        }
        self.world.maintain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skirmish_scenario_setup() {
        let mut scenario = SkirmishScenario::with_config(SkirmishConfig {
            team_size: 10,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.survivors(), 20);

        scenario.teardown();
        assert_eq!(scenario.survivors(), 0);
    }

    #[test]
    fn skirmish_scenario_update() {
        let mut scenario = SkirmishScenario::with_config(SkirmishConfig {
            team_size: 10,
            listeners: 3,
            ..Default::default()
        });
        scenario.setup();

        scenario.update();

        // Every fighter attacked once and each hit reached all three passive listeners.
        assert_eq!(scenario.observed(), 20 * 3);

        for _ in 0..200 {
            scenario.update();
        }
        assert!(scenario.survivors() < 20);
        assert!(scenario.is_over());

        scenario.teardown();
    }
}
