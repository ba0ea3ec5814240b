use std::time::Instant;

#[derive(Clone, Debug)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            start: Instant::now(),
        }
    }

    /// Seconds since creation or the last `reset`.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Returns the elapsed time and restarts the timer.
    pub fn lap(&mut self) -> f32 {
        let elapsed = self.elapsed();
        self.reset();
        elapsed
    }
}
