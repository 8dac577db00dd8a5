/// Default simulation rate. Velocities are per tick, so this fixes how fast
/// a shot plays out on screen.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Most ticks run for one frame; a stalled tab drops time rather than replay it.
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Turns variable frame time into a whole number of simulation ticks.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self { dt, accumulator: 0.0 }
    }

    /// Add frame time and return how many ticks to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * MAX_TICKS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Fraction of a tick left in the accumulator (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / TICKS_PER_SECOND)
    }
}
