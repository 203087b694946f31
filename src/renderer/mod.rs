use thiserror::Error;

use crate::core::particles::ParticleCloudParameters;

pub use self::{
    cloud::ParticleCloud,
    driver::FrameDriver,
    gpu::WgpuBackend,
    library::KernelSource,
    pipelines::{ComputePipelines, Kernel},
    pool::ParticlePool,
};

pub mod cloud;
pub mod driver;
pub mod gpu;
pub mod library;
pub mod pipelines;
pub mod pool;

#[cfg(test)]
pub(crate) mod mock;

/// Everything that can stop the particle renderer from coming up.
///
/// These are never retried: they describe a missing capability of the
/// environment, not a transient condition.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("No compatible GPU adapter is available")]
    AdapterUnavailable,
    #[error("GPU device could not be opened: {0}")]
    DeviceUnavailable(String),
    #[error("Render surface could not be created: {0}")]
    SurfaceUnavailable(String),
    #[error("Kernel library failed to load: {0}")]
    Library(String),
    #[error("Kernel entry point `{0}` is missing from the library")]
    MissingEntryPoint(&'static str),
    #[error("Compute pipeline `{entry}` could not be built: {reason}")]
    Pipeline { entry: &'static str, reason: String },
    #[error("Particle buffer of {size} bytes could not be allocated: {reason}")]
    BufferAllocation { size: u64, reason: String },
    #[error("A particle pool needs at least one particle")]
    EmptyPool,
    #[error("A particle pool needs at least one palette color")]
    EmptyPalette,
}

/// The two kernels of the particle cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelEntry {
    /// Fills the whole canvas with transparent black.
    Clear,
    /// One invocation per particle; evolves it and splats it onto the canvas.
    DrawParticles,
}

impl KernelEntry {
    pub const ALL: [KernelEntry; 2] = [KernelEntry::Clear, KernelEntry::DrawParticles];

    /// Entry point name in the kernel library.
    pub fn name(&self) -> &'static str {
        match self {
            KernelEntry::Clear => "clear",
            KernelEntry::DrawParticles => "draw_particles",
        }
    }
}

/// A 3D extent, used both for thread grids and thread-group sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchSize {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl DispatchSize {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Number of thread groups of `group` size needed to cover `self` threads.
    /// Partial groups round up; the kernels bounds-check their invocation ids.
    pub fn workgroups(&self, group: DispatchSize) -> DispatchSize {
        DispatchSize {
            width: self.width.div_ceil(group.width.max(1)),
            height: self.height.div_ceil(group.height.max(1)),
            depth: self.depth.div_ceil(group.depth.max(1)),
        }
    }
}

/// Preferred thread-group sizing of a compute pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadgroupLimits {
    /// Number of invocations that run in lockstep.
    pub execution_width: u32,
    /// Upper bound on invocations in a single thread group.
    pub max_threads_per_group: u32,
}

impl ThreadgroupLimits {
    pub fn new(execution_width: u32, max_threads_per_group: u32) -> Self {
        let max_threads_per_group = max_threads_per_group.max(1);
        Self {
            execution_width: execution_width.clamp(1, max_threads_per_group),
            max_threads_per_group,
        }
    }

    /// 2D group for full-texture passes: one execution width per row, as many
    /// rows as fit in a group.
    pub fn grid_group(&self) -> DispatchSize {
        DispatchSize::new(
            self.execution_width,
            self.max_threads_per_group / self.execution_width,
            1,
        )
    }

    /// 1D group for per-particle passes.
    pub fn linear_group(&self) -> DispatchSize {
        DispatchSize::new(self.execution_width, 1, 1)
    }
}

/// Resources bound to a single dispatch, besides the frame's canvas which is
/// always bound.
pub enum Bindings<'a, B: Backend> {
    Canvas,
    Particles {
        buffer: &'a B::Buffer,
        params: ParticleCloudParameters,
    },
}

/// One compute dispatch, sized in threads.
pub struct Dispatch<'a, B: Backend> {
    pub entry: KernelEntry,
    pub pipeline: &'a B::Pipeline,
    pub bindings: Bindings<'a, B>,
    pub grid: DispatchSize,
    pub threads_per_group: DispatchSize,
}

/// A presentable frame handed out by a [Backend].
pub trait Drawable {
    /// Size of the frame's backing texture, in pixels.
    fn size(&self) -> (u32, u32);
}

/// A loaded kernel library.
pub trait KernelLibrary {
    fn has_entry_point(&self, name: &str) -> bool;
}

/// The device side of the particle cloud: kernel compilation, buffer
/// allocation, frame acquisition and submission.
///
/// Resources are released by dropping them.
pub trait Backend: Sized {
    type Library: KernelLibrary;
    type Pipeline;
    type Buffer;
    type Frame: Drawable;

    fn load_library(&mut self) -> Result<Self::Library, StartupError>;

    fn create_pipeline(
        &mut self,
        library: &Self::Library,
        entry: KernelEntry,
    ) -> Result<Self::Pipeline, StartupError>;

    fn threadgroup_limits(&self, pipeline: &Self::Pipeline) -> ThreadgroupLimits;

    /// Largest particle buffer this backend can bind, in bytes.
    fn max_buffer_size(&self) -> u64;

    /// Allocates a storage buffer initialized with `contents`.
    fn create_particle_buffer(&mut self, contents: &[u8]) -> Result<Self::Buffer, StartupError>;

    /// Returns the next presentable frame, or `None` if there is none right now.
    fn acquire_frame(&mut self) -> Option<Self::Frame>;

    /// Records `dispatches` in order into a single command sequence, presents
    /// `frame` and submits.
    fn submit(&mut self, frame: Self::Frame, dispatches: &[Dispatch<'_, Self>]);

    /// Drawable size changed notification.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// What a single frame tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable was available; nothing was submitted.
    Skipped,
    /// The cloud was torn down; nothing was submitted.
    Halted,
}
