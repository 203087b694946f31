use std::ops::Range;

use glam::{Vec2, Vec4};
use rand::Rng;
use static_assertions::const_assert_eq;

use super::color::Palette;

/// Default number of particle slots in a cloud.
pub const DEFAULT_PARTICLE_COUNT: usize = 32;
/// Default radius range of freshly seeded particles, in pixels.
pub const DEFAULT_RADIUS_RANGE: Range<f32> = 4.0..30.0;
/// Default velocity shared by every freshly seeded particle.
pub const DEFAULT_VELOCITY: Vec2 = Vec2::new(5.0, 5.0);

/// State of a single particle slot, laid out exactly as the `Particle` struct
/// in `particles.wgsl` (storage array stride of 48 bytes).
///
/// The host only ever writes this once, at pool creation. After that the
/// draw kernel owns `lifespan` and `position`.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ParticleState {
    pub color: Vec4,
    pub radius: f32,
    pub lifespan: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    _padding: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<ParticleState>(), 48);

impl ParticleState {
    pub fn new(color: Vec4, radius: f32, velocity: Vec2) -> Self {
        Self {
            color,
            radius,
            lifespan: 0.0,
            position: Vec2::ZERO,
            velocity,
            _padding: [0.0; 2],
        }
    }
}

/// Per-frame inputs of the draw kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleCloudParameters {
    /// Focal point, normalized to the render surface (`x / width`, `y / height`).
    pub center: Vec2,
    /// Animation progress. Zero means the cloud is idle.
    pub progress: f32,
}

impl Default for ParticleCloudParameters {
    fn default() -> Self {
        Self {
            center: Vec2::splat(0.5),
            progress: 0.0,
        }
    }
}

/// Uniform payload handed to the draw kernel: `center.x, center.y, progress`,
/// padded to the 16 byte size of the WGSL `CloudParams` struct.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ParticleCloudUniform {
    pub center: Vec2,
    pub progress: f32,
    _padding: f32,
}

const_assert_eq!(std::mem::size_of::<ParticleCloudUniform>(), 16);

impl From<ParticleCloudParameters> for ParticleCloudUniform {
    fn from(params: ParticleCloudParameters) -> Self {
        Self {
            center: params.center,
            progress: params.progress,
            _padding: 0.0,
        }
    }
}

/// Everything needed to seed a particle pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    pub palette: Palette,
    pub velocity: Vec2,
    pub radius: Range<f32>,
}

impl ParticleConfig {
    /// Creates a config with the default velocity and radius range.
    pub fn new(count: usize, palette: Palette) -> Self {
        Self {
            count,
            palette,
            velocity: DEFAULT_VELOCITY,
            radius: DEFAULT_RADIUS_RANGE,
        }
    }

    /// The shiny button configuration: 32 particles over a random sparkle palette.
    pub fn sparkle(rng: &mut impl Rng) -> Self {
        Self::new(DEFAULT_PARTICLE_COUNT, Palette::sparkle(rng))
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Byte length of a pool built from this config, saturating at `u64::MAX`.
    pub fn buffer_size(&self) -> u64 {
        (self.count as u64).saturating_mul(std::mem::size_of::<ParticleState>() as u64)
    }
}

/// Builds the initial contents of every particle slot.
///
/// Colors cycle through the palette by slot index; only the radius is random.
pub fn seed_particles(config: &ParticleConfig, rng: &mut impl Rng) -> Vec<ParticleState> {
    (0..config.count)
        .map(|i| {
            ParticleState::new(
                config.palette.cycle(i),
                rng.gen_range(config.radius.clone()),
                config.velocity,
            )
        })
        .collect()
}
