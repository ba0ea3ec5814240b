mod timer;
pub use timer::*;

/// Nominal simulation rate; one `Scene::step` per displayed frame.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Wall-clock budget of a single tick in seconds.
pub fn tick_budget() -> f32 {
    1.0 / TICKS_PER_SECOND
}
