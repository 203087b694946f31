/// Duration of the press and release ramps, in seconds.
pub const PROGRESS_RAMP_SECONDS: f32 = 0.4;

/// Drives the cloud's `progress` with two linear keyframe tracks: on press it
/// jumps to 0 and ramps up to 1, on release it jumps to 1 and ramps down to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressAnimator {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Default for ProgressAnimator {
    fn default() -> Self {
        Self::new(PROGRESS_RAMP_SECONDS)
    }
}

impl ProgressAnimator {
    /// Creates an idle animator (progress 0) with the given ramp duration.
    pub fn new(duration: f32) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            elapsed: duration,
            duration,
        }
    }

    pub fn engage(&mut self) {
        self.restart(0.0, 1.0);
    }

    pub fn release(&mut self) {
        self.restart(1.0, 0.0);
    }

    fn restart(&mut self, from: f32, to: f32) {
        self.from = from;
        self.to = to;
        self.elapsed = 0.0;
    }

    /// Advances the active ramp by `dt` seconds and returns the new progress.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_idle_animator_is_zero() {
        let mut animator = ProgressAnimator::default();
        assert_eq!(animator.value(), 0.0);
        assert!(!animator.is_animating());
        assert_eq!(animator.advance(1.0), 0.0);
    }

    #[test]
    fn test_engage_ramps_up() {
        let mut animator = ProgressAnimator::default();
        animator.engage();
        assert_eq!(animator.value(), 0.0);
        assert!(animator.is_animating());

        assert!(approx(animator.advance(0.1), 0.25));
        assert!(approx(animator.advance(0.1), 0.5));
        assert_eq!(animator.advance(5.0), 1.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_release_jumps_to_one_then_ramps_down() {
        let mut animator = ProgressAnimator::default();
        animator.engage();
        animator.advance(0.1);

        animator.release();
        assert_eq!(animator.value(), 1.0);
        assert!(approx(animator.advance(0.3), 0.25));
        assert_eq!(animator.advance(0.1), 0.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_negative_time_does_not_rewind() {
        let mut animator = ProgressAnimator::default();
        animator.engage();
        animator.advance(0.2);
        assert!(approx(animator.advance(-1.0), 0.5));
    }
}
