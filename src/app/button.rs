use glam::Vec2;

use crate::core::{animation::ProgressAnimator, control::ControlSurface};

use super::gesture::DragGesture;

/// Host-side state of the shiny button: turns pointer input into published
/// focus and progress.
pub struct ShinyButton {
    control: ControlSurface,
    gesture: DragGesture,
    animator: ProgressAnimator,
    bounds: Vec2,
}

impl ShinyButton {
    pub fn new(control: ControlSurface, bounds: Vec2) -> Self {
        Self {
            control,
            gesture: DragGesture::default(),
            animator: ProgressAnimator::default(),
            bounds,
        }
    }

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    pub fn press(&mut self, location: Vec2) {
        let location = self.gesture.press(location);
        self.control.set_focus(Some(location), self.bounds);
        self.animator.engage();
        self.control.set_progress(self.animator.value());
        log::debug!("Button pressed at {location}");
    }

    pub fn drag(&mut self, location: Vec2) {
        let location = self.gesture.drag(location, self.bounds);
        self.control.set_focus(location, self.bounds);
    }

    pub fn release(&mut self) {
        if !self.gesture.is_dragging() {
            return;
        }
        self.gesture.release();
        self.animator.release();
        self.control.set_progress(self.animator.value());
        log::debug!("Button released");
    }

    /// Advances the progress ramp by `dt` seconds and publishes the result.
    pub fn tick(&mut self, dt: f32) {
        if self.animator.is_animating() {
            let progress = self.animator.advance(dt);
            self.control.set_progress(progress);
        }
    }

    /// Whether a press or release ramp is still running.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_pressed(&self) -> bool {
        self.gesture.is_dragging()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        core::{color::Palette, particles::ParticleConfig},
        renderer::{cloud::ParticleCloud, mock::MockBackend},
    };

    const BOUNDS: Vec2 = Vec2::new(240.0, 100.0);

    fn button() -> (ShinyButton, ControlSurface) {
        let control = ControlSurface::new();
        (ShinyButton::new(control.clone(), BOUNDS), control)
    }

    #[test]
    fn test_press_ramps_progress_up() {
        let (mut button, control) = button();
        assert!(!button.is_animating());

        button.press(Vec2::new(120.0, 50.0));
        assert_eq!(control.parameters().center, Vec2::splat(0.5));
        assert_eq!(control.parameters().progress, 0.0);
        assert!(button.is_animating());

        button.tick(0.2);
        assert!((control.parameters().progress - 0.5).abs() < 1e-5);
        assert!(control.is_active());

        button.tick(1.0);
        assert_eq!(control.parameters().progress, 1.0);
        assert!(!button.is_animating());
        assert!(control.is_active());
    }

    #[test]
    fn test_release_ramps_progress_down_and_idles() {
        let (mut button, control) = button();
        button.press(Vec2::new(60.0, 25.0));
        button.tick(1.0);

        button.release();
        assert_eq!(control.parameters().progress, 1.0);
        button.tick(0.1);
        assert!((control.parameters().progress - 0.75).abs() < 1e-5);

        button.tick(1.0);
        assert_eq!(control.parameters().progress, 0.0);
        assert!(!control.is_active());
        assert!(!button.is_animating());
    }

    #[test]
    fn test_drag_moves_focus_within_bounds() {
        let (mut button, control) = button();

        button.drag(Vec2::new(60.0, 25.0));
        assert_eq!(control.parameters().center, Vec2::splat(0.5));

        button.press(Vec2::new(120.0, 50.0));
        button.drag(Vec2::new(480.0, -10.0));
        assert_eq!(control.parameters().center, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let (mut button, control) = button();
        button.release();
        assert_eq!(control.parameters().progress, 0.0);
        assert!(!button.is_animating());
    }

    #[test]
    fn test_frames_are_scheduled_while_ramping_or_lit() -> anyhow::Result<()> {
        let config = ParticleConfig::new(8, Palette::new(vec![Vec4::ONE]).unwrap());
        let mut rng = StdRng::seed_from_u64(1);
        let cloud = ParticleCloud::new(MockBackend::new(), &config, &mut rng)?;
        let mut button = ShinyButton::new(cloud.control(), BOUNDS);
        let wants_frames = |cloud: &ParticleCloud<MockBackend>, button: &ShinyButton| {
            !cloud.is_paused() || button.is_animating()
        };
        assert!(!wants_frames(&cloud, &button));

        // progress is still 0 right after the press
        button.press(Vec2::new(120.0, 50.0));
        assert!(cloud.is_paused());
        assert!(wants_frames(&cloud, &button));

        button.tick(1.0);
        assert!(!button.is_animating());
        assert!(wants_frames(&cloud, &button));

        button.release();
        button.tick(1.0);
        assert!(cloud.is_paused());
        assert!(!wants_frames(&cloud, &button));
        Ok(())
    }
}
