//! Per-frame simulation step
//!
//! Advances every particle by one frame and paints it onto every target.
//! Order within the pass is observable behavior and must not change:
//! particles update in collection order, and each particle finishes its
//! full draw+update before the next one starts. A later particle's
//! separation can therefore move an already-painted earlier particle;
//! that correction only becomes visible next frame.

use super::draw::DrawTarget;
use super::state::SimState;

/// Advance the field by one frame, painting onto every target.
///
/// Queued host events are applied first, so pointer and bounds are stable
/// for the whole pass. Per particle, in index order:
/// paint (fill + outline on each target), pointer force, integrate,
/// boundary reflection, then one-sided separation against every sibling.
pub fn tick(state: &mut SimState, targets: &mut [&mut dyn DrawTarget]) {
    state.drain_events();
    state.frames += 1;

    let count = state.particles.len();
    for i in 0..count {
        for target in targets.iter_mut() {
            state.particles[i].draw(&mut **target);
        }

        let bounds = state.bounds;
        let pointer = state.pointer;
        {
            let particle = &mut state.particles[i];
            particle.apply_pointer_force(&pointer);
            particle.integrate();
            particle.reflect(bounds);
        }

        // Pairwise pass: sibling positions are read as they are right now,
        // so earlier particles are seen post-update, later ones pre-update.
        for j in 0..count {
            if j == i {
                continue;
            }
            let other_pos = state.particles[j].pos;
            let other_radius = state.particles[j].radius;
            state.particles[i].separate_from(other_pos, other_radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRICTION;
    use crate::sim::state::{InputEvent, Particle};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Target that records every paint call for inspection.
    #[derive(Default)]
    struct RecordingTarget {
        fills: Vec<(f32, f32, f32)>,
        strokes: Vec<(f32, f32, f32)>,
    }

    impl DrawTarget for RecordingTarget {
        fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
            self.fills.push((x, y, radius));
        }
        fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
            self.strokes.push((x, y, radius));
        }
    }

    fn still_particle(index: usize, x: f32, y: f32, radius: f32) -> Particle {
        Particle {
            index,
            radius,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            push: Vec2::ZERO,
            friction: FRICTION,
        }
    }

    /// Bare state with hand-placed particles and an idle pointer.
    fn state_with(particles: Vec<Particle>, width: f32, height: f32) -> SimState {
        let mut state = SimState::new(0, width, height, 0);
        state.particles = particles;
        state
    }

    #[test]
    fn test_overlapping_pair_separates_to_contact_plus_epsilon() {
        // Radii 10 + 10 at distance 15: overlapping. Lower index updates
        // first, gets pushed to distance 20.1, and the second particle
        // then sees a cleared neighbor and stays put.
        let particles = vec![
            still_particle(0, 100.0, 100.0, 10.0),
            still_particle(1, 115.0, 100.0, 10.0),
        ];
        let mut state = state_with(particles, 800.0, 600.0);

        tick(&mut state, &mut []);

        let a = state.particles[0].pos;
        let b = state.particles[1].pos;
        assert!((a.x - 94.9).abs() < 1e-3, "moved particle at {a:?}");
        assert!((a.y - 100.0).abs() < 1e-3);
        assert_eq!(b, Vec2::new(115.0, 100.0), "second particle must not move");
        assert!((a.distance(b) - 20.1).abs() < 1e-3);
    }

    #[test]
    fn test_separated_pair_stays_clear_after_both_update() {
        let particles = vec![
            still_particle(0, 100.0, 100.0, 10.0),
            still_particle(1, 115.0, 100.0, 10.0),
        ];
        let mut state = state_with(particles, 800.0, 600.0);

        for _ in 0..5 {
            tick(&mut state, &mut []);
            let d = state.particles[0].pos.distance(state.particles[1].pos);
            assert!(d >= 20.0 - 1e-3, "pair re-overlapped at distance {d}");
        }
    }

    #[test]
    fn test_pressed_pointer_pushes_away_then_friction_decays() {
        // Particle at rest in the center of 400x400, pointer pressed 50
        // units to its left (inside influence 200).
        let mut state = state_with(vec![still_particle(0, 200.0, 200.0, 10.0)], 400.0, 400.0);
        state.push_event(InputEvent::Press { x: 150.0, y: 200.0 });

        tick(&mut state, &mut []);

        // force = 200/50 = 4 along +X, decayed once before the move
        let p = &state.particles[0];
        assert!((p.push.x - 4.0 * FRICTION).abs() < 1e-4);
        assert!(p.push.y.abs() < 1e-4);
        assert!((p.pos.x - 202.4).abs() < 1e-3);

        // Released: the accumulator decays geometrically, no new force
        state.push_event(InputEvent::Release);
        tick(&mut state, &mut []);
        let p = &state.particles[0];
        assert!((p.push.x - 4.0 * FRICTION * FRICTION).abs() < 1e-4);
    }

    #[test]
    fn test_wall_reflection_flips_velocity_once() {
        let mut particle = still_particle(0, 389.8, 200.0, 10.0);
        particle.vel = Vec2::new(0.5, 0.0);
        let mut state = state_with(vec![particle], 400.0, 400.0);

        tick(&mut state, &mut []);
        let p = &state.particles[0];
        assert_eq!(p.pos.x, 390.0);
        assert_eq!(p.vel.x, -0.5);

        // Next frame it moves back inward, no second flip
        tick(&mut state, &mut []);
        let p = &state.particles[0];
        assert!((p.pos.x - 389.5).abs() < 1e-4);
        assert_eq!(p.vel.x, -0.5);
    }

    #[test]
    fn test_draw_happens_before_update() {
        let mut particle = still_particle(0, 100.0, 100.0, 10.0);
        particle.vel = Vec2::new(0.5, 0.0);
        let mut state = state_with(vec![particle], 400.0, 400.0);

        let mut target = RecordingTarget::default();
        tick(&mut state, &mut [&mut target]);

        // Painted at the previous frame's resolved position
        assert_eq!(target.fills, vec![(100.0, 100.0, 10.0)]);
        assert_eq!(target.strokes, vec![(100.0, 100.0, 10.0)]);
        assert!((state.particles[0].pos.x - 100.5).abs() < 1e-4);
    }

    #[test]
    fn test_mirrored_targets_receive_identical_frames() {
        let mut state = SimState::new(5, 800.0, 600.0, 10);
        let mut a = RecordingTarget::default();
        let mut b = RecordingTarget::default();

        tick(&mut state, &mut [&mut a, &mut b]);

        assert_eq!(a.fills.len(), 10);
        assert_eq!(a.fills, b.fills);
        assert_eq!(a.strokes, b.strokes);
    }

    #[test]
    fn test_push_stays_zero_without_pointer() {
        let mut state = SimState::new(11, 800.0, 600.0, 20);
        for _ in 0..10 {
            tick(&mut state, &mut []);
        }
        for p in &state.particles {
            assert_eq!(p.push, Vec2::ZERO);
        }
    }

    proptest! {
        /// A lone particle stays inside the bounds no matter where the
        /// pointer presses or how long the field runs. (With siblings the
        /// separation phase can overshoot a wall until the next frame's
        /// clamp, so containment is a single-particle law.)
        #[test]
        fn prop_single_particle_containment(
            seed in 0u64..1000,
            px in 0.0f32..400.0,
            py in 0.0f32..300.0,
            frames in 1usize..60,
        ) {
            let mut state = SimState::new(seed, 400.0, 300.0, 1);
            state.push_event(InputEvent::Press { x: px, y: py });
            for _ in 0..frames {
                tick(&mut state, &mut []);
                let p = &state.particles[0];
                prop_assert!(p.pos.x >= p.radius && p.pos.x <= 400.0 - p.radius);
                prop_assert!(p.pos.y >= p.radius && p.pos.y <= 300.0 - p.radius);
            }
        }

        /// With the pointer idle the push accumulator decays geometrically
        /// by exactly the friction factor each frame.
        #[test]
        fn prop_friction_decay_is_geometric(
            push_x in -100.0f32..100.0,
            push_y in -100.0f32..100.0,
        ) {
            let mut particle = still_particle(0, 2000.0, 2000.0, 10.0);
            particle.push = Vec2::new(push_x, push_y);
            let mut state = state_with(vec![particle], 4000.0, 4000.0);

            let mut expected = Vec2::new(push_x, push_y);
            for _ in 0..8 {
                tick(&mut state, &mut []);
                expected *= FRICTION;
                let p = &state.particles[0];
                prop_assert!((p.push.x - expected.x).abs() < 1e-3);
                prop_assert!((p.push.y - expected.y).abs() < 1e-3);
            }
            prop_assert!(state.particles[0].push.length() < expected.length() + 1e-3);
        }
    }
}
