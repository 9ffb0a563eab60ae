//! Frame-shaped benchmark scenarios.
//!
//! These scenarios mix entity churn, component access and event traffic the way an update loop
//! would, with representative entity counts.
//!
//! # Scenarios
//!
//! - **Particles**: high entity count, short lifetimes, constant destroy and recycle
//! - **Skirmish**: teams trading hits through the event bus with many listeners

pub mod particles;
pub mod skirmish;

pub use particles::{ParticleConfig, ParticleScenario};
pub use skirmish::{SkirmishConfig, SkirmishScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Number of live entities in this scenario.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (spawn entities, wire subscribers).
    fn setup(&mut self);

    /// Run one "frame" of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
