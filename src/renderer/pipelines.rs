use super::{Backend, KernelEntry, KernelLibrary, StartupError, ThreadgroupLimits};

/// A compiled kernel together with its preferred thread-group sizing.
pub struct Kernel<B: Backend> {
    pub entry: KernelEntry,
    pub pipeline: B::Pipeline,
    pub limits: ThreadgroupLimits,
}

/// The clear and draw-particles pipelines, compiled once at startup.
pub struct ComputePipelines<B: Backend> {
    pub clear: Kernel<B>,
    pub draw: Kernel<B>,
}

impl<B: Backend> ComputePipelines<B> {
    /// Loads the bundled kernel library and builds both pipelines.
    ///
    /// Any failure here is fatal: the cloud cannot render without both kernels.
    pub fn compile(backend: &mut B) -> Result<Self, StartupError> {
        let library = backend.load_library()?;
        let clear = Self::build(backend, &library, KernelEntry::Clear)?;
        let draw = Self::build(backend, &library, KernelEntry::DrawParticles)?;
        Ok(Self { clear, draw })
    }

    fn build(
        backend: &mut B,
        library: &B::Library,
        entry: KernelEntry,
    ) -> Result<Kernel<B>, StartupError> {
        if !library.has_entry_point(entry.name()) {
            return Err(StartupError::MissingEntryPoint(entry.name()));
        }

        let pipeline = backend.create_pipeline(library, entry)?;
        let limits = backend.threadgroup_limits(&pipeline);
        log::debug!(
            "Compiled `{}`: execution width {}, max {} threads per group",
            entry.name(),
            limits.execution_width,
            limits.max_threads_per_group
        );

        Ok(Kernel {
            entry,
            pipeline,
            limits,
        })
    }
}
