use crate::core::particles::ParticleCloudParameters;

use super::{
    Backend, Bindings, ComputePipelines, Dispatch, DispatchSize, Drawable, FrameOutcome,
    ParticlePool,
};

/// Encodes one frame per display refresh: clear the canvas, then let every
/// particle draw itself, then present.
pub struct FrameDriver<B: Backend> {
    pool: ParticlePool<B>,
    pipelines: ComputePipelines<B>,
    frames_presented: u64,
    frames_skipped: u64,
}

impl<B: Backend> FrameDriver<B> {
    pub fn new(pool: ParticlePool<B>, pipelines: ComputePipelines<B>) -> Self {
        Self {
            pool,
            pipelines,
            frames_presented: 0,
            frames_skipped: 0,
        }
    }

    /// Runs a single frame with the given parameters.
    ///
    /// A missing drawable is not an error: the frame is skipped and nothing is
    /// submitted. The next refresh tick simply tries again.
    pub fn draw_frame(
        &mut self,
        backend: &mut B,
        params: ParticleCloudParameters,
    ) -> FrameOutcome {
        let Some(frame) = backend.acquire_frame() else {
            self.frames_skipped += 1;
            log::trace!("No drawable available, skipping frame");
            return FrameOutcome::Skipped;
        };

        let (width, height) = frame.size();
        let clear = &self.pipelines.clear;
        let draw = &self.pipelines.draw;

        let dispatches = [
            Dispatch {
                entry: clear.entry,
                pipeline: &clear.pipeline,
                bindings: Bindings::Canvas,
                grid: DispatchSize::new(width, height, 1),
                threads_per_group: clear.limits.grid_group(),
            },
            Dispatch {
                entry: draw.entry,
                pipeline: &draw.pipeline,
                bindings: Bindings::Particles {
                    buffer: self.pool.buffer(),
                    params,
                },
                grid: DispatchSize::new(self.pool.count(), 1, 1),
                threads_per_group: draw.limits.linear_group(),
            },
        ];

        backend.submit(frame, &dispatches);
        self.frames_presented += 1;
        log::trace!(
            "Presented frame {} ({width}x{height}, progress {})",
            self.frames_presented,
            params.progress
        );

        FrameOutcome::Presented
    }

    pub fn pool(&self) -> &ParticlePool<B> {
        &self.pool
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
