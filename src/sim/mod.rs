//! Deterministic simulation module
//!
//! All particle logic lives here. This module must be pure and deterministic:
//! - Stable iteration order (by particle index)
//! - Seeded RNG only
//! - No rendering or platform dependencies (painting goes through `DrawTarget`)

pub mod collision;
pub mod draw;
pub mod state;
pub mod tick;

pub use collision::{pointer_push, reflect_axis, separation_target};
pub use draw::DrawTarget;
pub use state::{InputEvent, Particle, Pointer, SimState};
pub use tick::tick;
