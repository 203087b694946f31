//! The bundled WGSL kernel library and its load-time specialization.

use super::{DispatchSize, KernelLibrary, StartupError};

/// WGSL source of the `clear` and `draw_particles` kernels, with workgroup
/// sizes left as `#{...}` template values.
pub const PARTICLE_KERNELS: &str = include_str!("shaders/particles.wgsl");

/// Replaces every `#{NAME}` in `template` with its value.
pub fn substitute(template: &str, values: &[(&str, u32)]) -> String {
    let mut output = template.to_string();
    for (name, value) in values {
        output = output.replace(&format!("#{{{name}}}"), &value.to_string());
    }
    output
}

/// A specialized kernel library that parsed and validated.
#[derive(Debug, Clone)]
pub struct KernelSource {
    source: String,
    entry_points: Vec<String>,
}

impl KernelSource {
    /// Specializes [PARTICLE_KERNELS] with the given thread-group sizes.
    pub fn particle_kernels(
        clear_group: DispatchSize,
        draw_group: DispatchSize,
    ) -> Result<Self, StartupError> {
        Self::specialize(PARTICLE_KERNELS, clear_group, draw_group)
    }

    pub fn specialize(
        template: &str,
        clear_group: DispatchSize,
        draw_group: DispatchSize,
    ) -> Result<Self, StartupError> {
        let source = substitute(
            template,
            &[
                ("CLEAR_GROUP_X", clear_group.width),
                ("CLEAR_GROUP_Y", clear_group.height),
                ("DRAW_GROUP_X", draw_group.width),
            ],
        );
        Self::parse(source)
    }

    /// Parses and validates `source`, collecting its compute entry points.
    pub fn parse(source: String) -> Result<Self, StartupError> {
        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| StartupError::Library(e.emit_to_string(&source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| StartupError::Library(e.into_inner().to_string()))?;

        let entry_points = module
            .entry_points
            .iter()
            .filter(|ep| ep.stage == naga::ShaderStage::Compute)
            .map(|ep| ep.name.clone())
            .collect::<Vec<_>>();

        log::debug!("Loaded kernel library with entry points {entry_points:?}");

        Ok(Self {
            source,
            entry_points,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl KernelLibrary for KernelSource {
    fn has_entry_point(&self, name: &str) -> bool {
        self.entry_points.iter().any(|ep| ep == name)
    }
}
