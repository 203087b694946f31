use rand::Rng;

use crate::core::particles::{seed_particles, ParticleConfig, ParticleState};

use super::{Backend, StartupError};

/// Fixed-capacity, device-resident array of [ParticleState].
///
/// The host seeds the buffer once at creation and never touches it again;
/// after that only the draw kernel reads and writes particle state.
pub struct ParticlePool<B: Backend> {
    buffer: B::Buffer,
    count: u32,
}

impl<B: Backend> ParticlePool<B> {
    pub fn create(
        backend: &mut B,
        config: &ParticleConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, StartupError> {
        if config.count == 0 {
            return Err(StartupError::EmptyPool);
        }
        if config.palette.is_empty() {
            return Err(StartupError::EmptyPalette);
        }


        // checked before any host-side seeding
        let size = config.buffer_size();
        let max = backend.max_buffer_size();
        if size > max {
            return Err(StartupError::BufferAllocation {
                size,
                reason: format!("exceeds the {max} byte particle buffer limit"),
            });
        }
        let count = u32::try_from(config.count).map_err(|_| StartupError::BufferAllocation {
            size,
            reason: format!("{} particles do not fit a dispatch grid", config.count),
        })?;

        let particles = seed_particles(config, rng);
        let buffer = backend.create_particle_buffer(bytemuck::cast_slice(&particles))?;

        log::info!("Created particle pool: {count} particles, {size} bytes");

        Ok(Self { buffer, count })
    }

    pub fn buffer(&self) -> &B::Buffer {
        &self.buffer
    }

    /// Number of particle slots, which is also the draw grid width.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn byte_len(&self) -> u64 {
        self.count as u64 * std::mem::size_of::<ParticleState>() as u64
    }
}
