//! Recording backend for exercising the renderer without a GPU.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::core::particles::ParticleCloudUniform;

use super::{
    Backend, Bindings, Dispatch, DispatchSize, Drawable, KernelEntry, KernelLibrary, StartupError,
    ThreadgroupLimits,
};

/// Live resource counts, shared with every resource the backend hands out.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    buffers: Arc<AtomicUsize>,
    pipelines: Arc<AtomicUsize>,
}

impl Counters {
    pub fn buffers(&self) -> usize {
        self.buffers.load(Ordering::SeqCst)
    }

    pub fn pipelines(&self) -> usize {
        self.pipelines.load(Ordering::SeqCst)
    }
}

/// Decrements its counter when dropped.
#[derive(Debug)]
struct Live(Arc<AtomicUsize>);

impl Live {
    fn track(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for Live {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct MockBuffer {
    contents: Vec<u8>,
    _live: Live,
}

impl MockBuffer {
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

#[derive(Debug)]
pub struct MockPipeline {
    pub entry: KernelEntry,
    _live: Live,
}

pub struct MockLibrary {
    entry_points: Vec<&'static str>,
}

impl KernelLibrary for MockLibrary {
    fn has_entry_point(&self, name: &str) -> bool {
        self.entry_points.iter().any(|ep| *ep == name)
    }
}

pub struct MockFrame {
    size: (u32, u32),
}

impl Drawable for MockFrame {
    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// A dispatch as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDispatch {
    pub entry: KernelEntry,
    pub grid: DispatchSize,
    pub threads_per_group: DispatchSize,
    pub workgroups: DispatchSize,
    /// Byte length of the bound particle buffer, if any.
    pub particle_bytes: Option<usize>,
    /// Uniform payload, as it would be uploaded.
    pub uniforms: Option<Vec<u8>>,
}

/// One submitted command sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub frame_size: (u32, u32),
    pub dispatches: Vec<RecordedDispatch>,
    pub presented: bool,
}

pub struct MockBackend {
    pub limits: ThreadgroupLimits,
    pub frame_size: (u32, u32),
    pub frame_available: bool,
    pub fail_allocations: bool,
    pub max_buffer_size: u64,
    pub missing_entry: Option<KernelEntry>,
    pub fail_pipeline: Option<KernelEntry>,
    pub submissions: Vec<Submission>,
    pub resizes: Vec<(u32, u32)>,
    counters: Counters,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            limits: ThreadgroupLimits::new(32, 1024),
            frame_size: (240, 100),
            frame_available: true,
            fail_allocations: false,
            max_buffer_size: 128 << 20,
            missing_entry: None,
            fail_pipeline: None,
            submissions: Vec::new(),
            resizes: Vec::new(),
            counters: Counters::default(),
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }

    /// Total dispatches across all submissions.
    pub fn dispatch_count(&self) -> usize {
        self.submissions.iter().map(|s| s.dispatches.len()).sum()
    }
}

impl Backend for MockBackend {
    type Library = MockLibrary;
    type Pipeline = MockPipeline;
    type Buffer = MockBuffer;
    type Frame = MockFrame;

    fn load_library(&mut self) -> Result<MockLibrary, StartupError> {
        let entry_points = KernelEntry::ALL
            .into_iter()
            .filter(|entry| Some(*entry) != self.missing_entry)
            .map(|entry| entry.name())
            .collect();
        Ok(MockLibrary { entry_points })
    }

    fn create_pipeline(
        &mut self,
        _library: &MockLibrary,
        entry: KernelEntry,
    ) -> Result<MockPipeline, StartupError> {
        if self.fail_pipeline == Some(entry) {
            return Err(StartupError::Pipeline {
                entry: entry.name(),
                reason: "rejected by mock".to_string(),
            });
        }
        Ok(MockPipeline {
            entry,
            _live: Live::track(&self.counters.pipelines),
        })
    }

    fn threadgroup_limits(&self, _pipeline: &MockPipeline) -> ThreadgroupLimits {
        self.limits
    }

    fn max_buffer_size(&self) -> u64 {
        self.max_buffer_size
    }

    fn create_particle_buffer(&mut self, contents: &[u8]) -> Result<MockBuffer, StartupError> {
        if self.fail_allocations {
            return Err(StartupError::BufferAllocation {
                size: contents.len() as u64,
                reason: "out of memory".to_string(),
            });
        }
        Ok(MockBuffer {
            contents: contents.to_vec(),
            _live: Live::track(&self.counters.buffers),
        })
    }

    fn acquire_frame(&mut self) -> Option<MockFrame> {
        self.frame_available.then_some(MockFrame {
            size: self.frame_size,
        })
    }

    fn submit(&mut self, frame: MockFrame, dispatches: &[Dispatch<'_, Self>]) {
        let dispatches = dispatches
            .iter()
            .map(|dispatch| {
                let (particle_bytes, uniforms) = match &dispatch.bindings {
                    Bindings::Canvas => (None, None),
                    Bindings::Particles { buffer, params } => {
                        let uniform = ParticleCloudUniform::from(*params);
                        (
                            Some(buffer.contents.len()),
                            Some(bytemuck::bytes_of(&uniform).to_vec()),
                        )
                    }
                };
                RecordedDispatch {
                    entry: dispatch.pipeline.entry,
                    grid: dispatch.grid,
                    threads_per_group: dispatch.threads_per_group,
                    workgroups: dispatch.grid.workgroups(dispatch.threads_per_group),
                    particle_bytes,
                    uniforms,
                }
            })
            .collect();

        self.submissions.push(Submission {
            frame_size: frame.size,
            dispatches,
            presented: true,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
        self.frame_size = (width, height);
    }
}
