//! Simulation state and core types
//!
//! Everything the per-frame step reads or writes lives here: the particle
//! collection, the pointer, the bounds, and the inbound event queue.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

use super::collision;
use super::draw::DrawTarget;

/// Pointer interaction state
///
/// `radius` is the fixed influence radius; it never changes after
/// construction. Position and pressed-state are written only by draining
/// the event queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub pos: Vec2,
    pub pressed: bool,
    pub radius: f32,
}

impl Pointer {
    fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            pressed: false,
            radius: POINTER_RADIUS,
        }
    }
}

/// Inbound host events, queued by the platform layer and drained
/// synchronously at the start of each step so no handler can interleave
/// with the pairwise pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer button pressed at the given position
    Press { x: f32, y: f32 },
    /// Pointer moved; position is taken only while pressed
    Move { x: f32, y: f32 },
    /// Pointer button released
    Release,
    /// Simulation area resized
    Resize { width: f32, height: f32 },
}

/// A circular body in the field
///
/// `index` is its stable identity within the owning collection: it selects
/// the radius class at creation and excludes the particle from colliding
/// with itself. Radius and friction are immutable after creation.
#[derive(Debug, Clone)]
pub struct Particle {
    pub index: usize,
    pub radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Transient displacement imparted by the pointer, decayed by
    /// `friction` every frame whether or not the pointer is active
    pub push: Vec2,
    pub friction: f32,
}

impl Particle {
    /// Create a particle with a class-dependent radius and a random
    /// in-bounds position and drift velocity.
    pub fn new(index: usize, bounds: Vec2, rng: &mut Pcg32) -> Self {
        let radius = if index % LARGE_EVERY == 0 {
            (rng.random_range(0.0..1.0) * LARGE_RADIUS_SPAN + LARGE_RADIUS_MIN).floor()
        } else {
            (rng.random_range(0.0..1.0) * SMALL_RADIUS_SPAN + SMALL_RADIUS_MIN).floor()
        };
        Self {
            index,
            radius,
            pos: random_position(radius, bounds, rng),
            vel: Vec2::new(
                rng.random_range(-DRIFT_SPEED..DRIFT_SPEED),
                rng.random_range(-DRIFT_SPEED..DRIFT_SPEED),
            ),
            push: Vec2::ZERO,
            friction: FRICTION,
        }
    }

    /// Paint this particle: fill, then outline. No state mutation.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        target.fill_circle(self.pos.x, self.pos.y, self.radius);
        target.stroke_circle(self.pos.x, self.pos.y, self.radius);
    }

    /// Update phase 1: accumulate pointer repulsion while pressed.
    pub fn apply_pointer_force(&mut self, pointer: &Pointer) {
        if !pointer.pressed {
            return;
        }
        if let Some(force) = collision::pointer_push(self.pos, pointer.pos, pointer.radius) {
            self.push += force;
        }
    }

    /// Update phase 2: decay the push accumulator, then advance position.
    pub fn integrate(&mut self) {
        self.push *= self.friction;
        self.pos += self.push + self.vel;
    }

    /// Update phase 3: reflect off the rectangular boundary, per axis.
    pub fn reflect(&mut self, bounds: Vec2) {
        let (x, vx) = collision::reflect_axis(self.pos.x, self.vel.x, self.radius, bounds.x);
        let (y, vy) = collision::reflect_axis(self.pos.y, self.vel.y, self.radius, bounds.y);
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::new(vx, vy);
    }

    /// Update phase 4 (one neighbor): move off an overlapping sibling.
    /// One-sided: only this particle moves; the sibling runs the symmetric
    /// correction on its own turn.
    pub fn separate_from(&mut self, other_pos: Vec2, other_radius: f32) {
        let sum_of_radii = self.radius + other_radius;
        if let Some(target) = collision::separation_target(self.pos, other_pos, sum_of_radii) {
            self.pos = target;
        }
    }

    /// Re-randomize position within the given bounds. Velocity, radius, and
    /// push accumulator are untouched. Used on resize.
    pub fn reset(&mut self, bounds: Vec2, rng: &mut Pcg32) {
        self.pos = random_position(self.radius, bounds, rng);
    }
}

/// Uniform in-bounds position: each axis in `[radius, extent - radius]`.
fn random_position(radius: f32, bounds: Vec2, rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        radius + rng.random_range(0.0..1.0) * (bounds.x - radius * 2.0),
        radius + rng.random_range(0.0..1.0) * (bounds.y - radius * 2.0),
    )
}

/// Complete simulation state
///
/// Exclusively owns the particle collection and pointer state; nothing
/// outside this struct mutates either. Particles never hold a reference
/// back here - the step passes them what they need.
pub struct SimState {
    /// Legal position range for all particles: `[0, width] x [0, height]`
    pub bounds: Vec2,
    /// Fixed count, index-stable; collection order is update order
    pub particles: Vec<Particle>,
    pub pointer: Pointer,
    /// Frame counter
    pub frames: u64,
    rng: Pcg32,
    events: Vec<InputEvent>,
}

impl SimState {
    /// Build a field of `count` particles inside `width x height`.
    pub fn new(seed: u64, width: f32, height: f32, count: usize) -> Self {
        let bounds = Vec2::new(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..count)
            .map(|index| Particle::new(index, bounds, &mut rng))
            .collect();
        Self {
            bounds,
            particles,
            pointer: Pointer::new(),
            frames: 0,
            rng,
            events: Vec::new(),
        }
    }

    /// Queue a host event for the next step. Safe to call from event
    /// handlers at any time between steps.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Apply all queued events in arrival order. Called at the start of
    /// each step, never mid-pass.
    pub(crate) fn drain_events(&mut self) {
        for i in 0..self.events.len() {
            let event = self.events[i];
            self.apply(event);
        }
        self.events.clear();
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press { x, y } => {
                self.pointer.pressed = true;
                self.pointer.pos = Vec2::new(x, y);
            }
            InputEvent::Move { x, y } => {
                if self.pointer.pressed {
                    self.pointer.pos = Vec2::new(x, y);
                }
            }
            InputEvent::Release => {
                self.pointer.pressed = false;
            }
            InputEvent::Resize { width, height } => {
                self.bounds = Vec2::new(width, height);
                log::info!("resized to {}x{}", width, height);
                let bounds = self.bounds;
                for particle in &mut self.particles {
                    particle.reset(bounds, &mut self.rng);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_classes_by_index() {
        let state = SimState::new(7, 800.0, 600.0, 41);
        for particle in &state.particles {
            if particle.index % LARGE_EVERY == 0 {
                assert!(
                    particle.radius >= LARGE_RADIUS_MIN,
                    "particle {} should be large, radius {}",
                    particle.index,
                    particle.radius
                );
                assert!(particle.radius < LARGE_RADIUS_MIN + LARGE_RADIUS_SPAN);
            } else {
                assert!(particle.radius >= SMALL_RADIUS_MIN);
                assert!(particle.radius < SMALL_RADIUS_MIN + SMALL_RADIUS_SPAN);
            }
            // Radii are whole numbers
            assert_eq!(particle.radius, particle.radius.floor());
        }
    }

    #[test]
    fn test_spawn_inside_bounds() {
        let state = SimState::new(42, 800.0, 600.0, 100);
        for p in &state.particles {
            assert!(p.pos.x >= p.radius && p.pos.x <= 800.0 - p.radius);
            assert!(p.pos.y >= p.radius && p.pos.y <= 600.0 - p.radius);
        }
    }

    #[test]
    fn test_spawn_velocity_range() {
        let state = SimState::new(42, 800.0, 600.0, 100);
        for p in &state.particles {
            assert!(p.vel.x.abs() <= DRIFT_SPEED);
            assert!(p.vel.y.abs() <= DRIFT_SPEED);
            assert_eq!(p.push, Vec2::ZERO);
        }
    }

    #[test]
    fn test_pointer_transitions() {
        let mut state = SimState::new(1, 400.0, 400.0, 0);

        // Move while idle: position ignored
        state.push_event(InputEvent::Move { x: 10.0, y: 10.0 });
        state.drain_events();
        assert!(!state.pointer.pressed);
        assert_eq!(state.pointer.pos, Vec2::ZERO);

        // Press engages and takes the position
        state.push_event(InputEvent::Press { x: 50.0, y: 60.0 });
        state.drain_events();
        assert!(state.pointer.pressed);
        assert_eq!(state.pointer.pos, Vec2::new(50.0, 60.0));

        // Move while engaged refreshes the position
        state.push_event(InputEvent::Move { x: 70.0, y: 80.0 });
        state.drain_events();
        assert_eq!(state.pointer.pos, Vec2::new(70.0, 80.0));

        // Release disengages but keeps the last position
        state.push_event(InputEvent::Release);
        state.drain_events();
        assert!(!state.pointer.pressed);
        assert_eq!(state.pointer.pos, Vec2::new(70.0, 80.0));
    }

    #[test]
    fn test_events_apply_in_arrival_order() {
        let mut state = SimState::new(1, 400.0, 400.0, 0);
        state.push_event(InputEvent::Press { x: 1.0, y: 1.0 });
        state.push_event(InputEvent::Release);
        state.drain_events();
        assert!(!state.pointer.pressed);
    }

    #[test]
    fn test_resize_resets_positions_keeps_kinematics() {
        let mut state = SimState::new(9, 1200.0, 900.0, 20);
        let before: Vec<_> = state
            .particles
            .iter()
            .map(|p| (p.radius, p.vel, p.push))
            .collect();

        state.push_event(InputEvent::Resize {
            width: 500.0,
            height: 400.0,
        });
        state.drain_events();

        assert_eq!(state.bounds, Vec2::new(500.0, 400.0));
        for (p, (radius, vel, push)) in state.particles.iter().zip(before) {
            assert!(p.pos.x >= p.radius && p.pos.x <= 500.0 - p.radius);
            assert!(p.pos.y >= p.radius && p.pos.y <= 400.0 - p.radius);
            assert_eq!(p.radius, radius);
            assert_eq!(p.vel, vel);
            assert_eq!(p.push, push);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = SimState::new(1234, 800.0, 600.0, 50);
        let b = SimState::new(1234, 800.0, 600.0, 50);
        for (pa, pb) in a.particles.iter().zip(&b.particles) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.radius, pb.radius);
        }
    }
}
