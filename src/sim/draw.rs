//! Drawing capability consumed by the simulation
//!
//! The step interleaves painting and updating per particle, so the sim needs
//! a seam to paint through without knowing anything about surfaces. Any
//! number of targets can receive the same frame (mirroring); painting must
//! not mutate shared state.

/// A surface the simulation can paint circles onto.
pub trait DrawTarget {
    /// Paint a filled circle centered at `(x, y)`.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
    /// Paint a circle outline centered at `(x, y)`.
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32);
}
