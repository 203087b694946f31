use std::num::NonZeroU64;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::particles::ParticleCloudUniform;

use self::present::{Canvas, Presenter, CANVAS_FORMAT};

use super::{
    Backend, Bindings, Dispatch, Drawable, KernelEntry, KernelLibrary, KernelSource, StartupError,
    ThreadgroupLimits,
};

pub mod present;

/// SIMD width assumed for every adapter; wgpu has no per-pipeline query.
pub const EXECUTION_WIDTH: u32 = 32;
/// Cap on invocations per workgroup, below the WebGPU default of 256.
pub const MAX_THREADS_PER_GROUP: u32 = 256;

pub struct WgpuLibrary {
    source: KernelSource,
    module: wgpu::ShaderModule,
}

impl KernelLibrary for WgpuLibrary {
    fn has_entry_point(&self, name: &str) -> bool {
        self.source.has_entry_point(name)
    }
}

pub struct WgpuPipeline {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

pub struct WgpuFrame {
    texture: wgpu::SurfaceTexture,
    size: (u32, u32),
}

impl Drawable for WgpuFrame {
    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// [Backend] over a wgpu device presenting to a window surface.
///
/// The kernels draw into an offscreen [Canvas]; each frame ends with a blit of
/// the canvas onto the surface texture.
pub struct WgpuBackend {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    limits: ThreadgroupLimits,
    uniforms: wgpu::Buffer,
    presenter: Presenter,
    canvas: Option<Canvas>,
}

impl WgpuBackend {
    /// Opens a device for `window`.
    ///
    /// The window must outlive the backend.
    pub fn new(window: &Window) -> Result<Self, StartupError> {
        pollster::block_on(Self::new_async(window))
    }

    async fn new_async(window: &Window) -> Result<Self, StartupError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = unsafe { instance.create_surface(window) }
            .map_err(|e| StartupError::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(StartupError::AdapterUnavailable)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("particle cloud device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| StartupError::DeviceUnavailable(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("Uncaptured wgpu error: {error}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| {
                StartupError::SurfaceUnavailable("surface reports no formats".to_string())
            })?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("Surface format {surface_format:?}, alpha mode {alpha_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
        };

        let device_limits = device.limits();
        let limits = ThreadgroupLimits::new(
            EXECUTION_WIDTH,
            MAX_THREADS_PER_GROUP.min(device_limits.max_compute_invocations_per_workgroup),
        );

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle cloud uniforms"),
            size: std::mem::size_of::<ParticleCloudUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let presenter = Presenter::new(&device, surface_format);

        let mut backend = Self {
            surface,
            device,
            queue,
            config,
            limits,
            uniforms,
            presenter,
            canvas: None,
        };
        backend.configure();

        Ok(backend)
    }

    /// Applies the current surface configuration and rebuilds the canvas.
    /// A zero-sized surface leaves the backend without a canvas until the next
    /// resize.
    fn configure(&mut self) {
        if self.config.width == 0 || self.config.height == 0 {
            log::debug!("Surface is zero-sized, not configuring");
            self.canvas = None;
            return;
        }

        self.surface.configure(&self.device, &self.config);
        self.canvas = Some(self.presenter.create_canvas(
            &self.device,
            self.config.width,
            self.config.height,
        ));
    }

    fn bind_group_layout(&self, entry: KernelEntry) -> wgpu::BindGroupLayout {
        let canvas = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: CANVAS_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        };

        let entries = match entry {
            KernelEntry::Clear => vec![canvas],
            KernelEntry::DrawParticles => vec![
                canvas,
                // particles
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // cloud parameters
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<ParticleCloudUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        };

        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(entry.name()),
                entries: &entries,
            })
    }

    fn bind_group(&self, canvas: &Canvas, dispatch: &Dispatch<'_, Self>) -> wgpu::BindGroup {
        let canvas_entry = wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(&canvas.view),
        };

        let entries = match &dispatch.bindings {
            Bindings::Canvas => vec![canvas_entry],
            Bindings::Particles { buffer, .. } => vec![
                canvas_entry,
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniforms.as_entire_binding(),
                },
            ],
        };

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(dispatch.entry.name()),
            layout: &dispatch.pipeline.bind_group_layout,
            entries: &entries,
        })
    }
}

impl Backend for WgpuBackend {
    type Library = WgpuLibrary;
    type Pipeline = WgpuPipeline;
    type Buffer = wgpu::Buffer;
    type Frame = WgpuFrame;

    fn load_library(&mut self) -> Result<WgpuLibrary, StartupError> {
        let source =
            KernelSource::particle_kernels(self.limits.grid_group(), self.limits.linear_group())?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("particle kernels"),
                source: wgpu::ShaderSource::Wgsl(source.source().into()),
            });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(StartupError::Library(error.to_string()));
        }

        Ok(WgpuLibrary { source, module })
    }

    fn create_pipeline(
        &mut self,
        library: &WgpuLibrary,
        entry: KernelEntry,
    ) -> Result<WgpuPipeline, StartupError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = self.bind_group_layout(entry);
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(entry.name()),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(entry.name()),
                layout: Some(&layout),
                module: &library.module,
                entry_point: entry.name(),
            });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(StartupError::Pipeline {
                entry: entry.name(),
                reason: error.to_string(),
            });
        }

        Ok(WgpuPipeline {
            pipeline,
            bind_group_layout,
        })
    }

    fn threadgroup_limits(&self, _pipeline: &WgpuPipeline) -> ThreadgroupLimits {
        self.limits
    }

    fn max_buffer_size(&self) -> u64 {
        let limits = self.device.limits();
        (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size)
    }

    fn create_particle_buffer(&mut self, contents: &[u8]) -> Result<wgpu::Buffer, StartupError> {
        let size = contents.len() as u64;

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("particle pool"),
                contents,
                usage: wgpu::BufferUsages::STORAGE,
            });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(StartupError::BufferAllocation {
                size,
                reason: error.to_string(),
            });
        }

        Ok(buffer)
    }

    fn acquire_frame(&mut self) -> Option<WgpuFrame> {
        let size = self.canvas.as_ref()?.size();

        match self.surface.get_current_texture() {
            Ok(texture) => Some(WgpuFrame { texture, size }),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.configure();
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::trace!("Timed out waiting for a drawable");
                None
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::warn!("Out of memory acquiring a drawable");
                None
            }
        }
    }

    fn submit(&mut self, frame: WgpuFrame, dispatches: &[Dispatch<'_, Self>]) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };

        for dispatch in dispatches {
            if let Bindings::Particles { params, .. } = &dispatch.bindings {
                let uniform = ParticleCloudUniform::from(*params);
                self.queue
                    .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniform));
            }
        }

        let bind_groups = dispatches
            .iter()
            .map(|dispatch| self.bind_group(canvas, dispatch))
            .collect::<Vec<_>>();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("particle cloud encoder"),
            });

        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("particle cloud compute pass"),
                timestamp_writes: None,
            });

            for (dispatch, bind_group) in dispatches.iter().zip(&bind_groups) {
                let groups = dispatch.grid.workgroups(dispatch.threads_per_group);
                cpass.set_pipeline(&dispatch.pipeline.pipeline);
                cpass.set_bind_group(0, bind_group, &[]);
                cpass.dispatch_workgroups(groups.width, groups.height, groups.depth);
            }
        }

        let view = frame
            .texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.presenter.encode(&mut encoder, canvas, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.texture.present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.configure();
    }
}
