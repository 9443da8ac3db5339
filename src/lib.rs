//! Drift Field - an interactive 2D particle field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particle kinematics, pointer repulsion, collisions)
//! - `renderer`: WebGPU instanced-circle rendering pipeline
//! - `settings`: User preferences

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Simulation tuning constants
pub mod consts {
    /// Number of particles in the field (Medium quality)
    pub const PARTICLE_COUNT: usize = 100;

    /// Every Nth particle (by creation index) draws from the large radius class
    pub const LARGE_EVERY: usize = 20;
    /// Large class radius: `floor(rand * SPAN + MIN)`
    pub const LARGE_RADIUS_MIN: f32 = 50.0;
    pub const LARGE_RADIUS_SPAN: f32 = 20.0;
    /// Normal class radius: `floor(rand * SPAN + MIN)`
    pub const SMALL_RADIUS_MIN: f32 = 5.0;
    pub const SMALL_RADIUS_SPAN: f32 = 30.0;

    /// Drift velocity per axis is drawn from `[-DRIFT_SPEED, DRIFT_SPEED)`
    pub const DRIFT_SPEED: f32 = 0.5;

    /// Geometric decay applied to the pointer-push accumulator every frame
    pub const FRICTION: f32 = 0.6;

    /// Fixed pointer influence radius (pixels)
    pub const POINTER_RADIUS: f32 = 200.0;

    /// Slack added past the contact distance when separating overlapping
    /// particles, so exact contact doesn't re-trigger next frame
    pub const SEPARATION_EPSILON: f32 = 0.1;

    /// Lower bound applied to center distances before division. Keeps the
    /// repulsion force and separation unit vector finite when centers
    /// coincide; the force stays enormous, matching the unclamped feel.
    pub const DISTANCE_FLOOR: f32 = 1e-4;
}
