use rand::Rng;

use crate::core::{control::ControlSurface, particles::ParticleConfig};

use super::{Backend, ComputePipelines, FrameDriver, FrameOutcome, ParticlePool, StartupError};

/// A particle cloud bound to one drawable surface.
///
/// The cloud is paused whenever its control reports no progress; the host is
/// expected to stop requesting redraws while [ParticleCloud::is_paused] holds.
pub struct ParticleCloud<B: Backend> {
    backend: B,
    driver: Option<FrameDriver<B>>,
    control: ControlSurface,
}

impl<B: Backend> ParticleCloud<B> {
    pub fn new(
        mut backend: B,
        config: &ParticleConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, StartupError> {
        let pipelines = ComputePipelines::compile(&mut backend)?;
        let pool = ParticlePool::create(&mut backend, config, rng)?;

        Ok(Self {
            backend,
            driver: Some(FrameDriver::new(pool, pipelines)),
            control: ControlSurface::new(),
        })
    }

    /// Writer handle for the host's gesture layer.
    pub fn control(&self) -> ControlSurface {
        self.control.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.driver.is_none() || !self.control.is_active()
    }

    pub fn is_torn_down(&self) -> bool {
        self.driver.is_none()
    }

    /// Draws one frame with the most recently published parameters.
    pub fn redraw(&mut self) -> FrameOutcome {
        let Some(driver) = self.driver.as_mut() else {
            return FrameOutcome::Halted;
        };
        let params = self.control.parameters();
        driver.draw_frame(&mut self.backend, params)
    }

    pub fn drawable_size_changed(&mut self, width: u32, height: u32) {
        log::debug!("Drawable size changed to {width}x{height}");
        self.backend.resize(width, height);
    }

    /// Stops rendering for good and releases the particle buffer and pipelines.
    pub fn teardown(&mut self) {
        if let Some(driver) = self.driver.take() {
            log::info!(
                "Tearing down particle cloud after {} frames ({} skipped)",
                driver.frames_presented(),
                driver.frames_skipped()
            );
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
