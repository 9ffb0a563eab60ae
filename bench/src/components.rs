//! Common component and event types used across benchmarks.
//!
//! These are sized like typical game data so the type-erased storage sees realistic payloads.

use rusty_macros::{Component, Event};
use rusty_substrate::ecs::Entity;

// =============================================================================
// Transform Components
// =============================================================================

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4x4 transformation matrix (64 bytes).
#[derive(Component, Clone, Copy, Debug)]
pub struct Transform {
    pub matrix: [[f32; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

// =============================================================================
// Game Entity Components
// =============================================================================

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Team/faction identifier.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Team {
    pub id: u32,
}

/// Particle lifetime tracking.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

/// A Particle marker
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Particle;

// =============================================================================
// Events
// =============================================================================

/// One entity damaged another.
#[derive(Event, Clone, Copy, Debug)]
pub struct Hit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// A frame boundary.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct Tick {
    pub frame: u64,
}
