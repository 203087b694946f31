use std::time::Instant;

/// Frame clock for the host loop.
pub struct Time {
    start_time: Instant,
    last_update_time: Instant,
    pub delta_time: f32,
    pub total_time: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update_time: now,
            delta_time: 0.0,
            total_time: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Advances the clock to `now`. Instants earlier than the last update count as zero time.
    pub fn update_at(&mut self, now: Instant) {
        self.delta_time = now
            .saturating_duration_since(self.last_update_time)
            .as_secs_f32();
        self.total_time = now.saturating_duration_since(self.start_time).as_secs_f32();
        self.last_update_time = now.max(self.last_update_time);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
