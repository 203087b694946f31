use clap::Parser;
use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};

use sparkle::prelude::*;

#[derive(Debug, clap::Parser)]
struct Args {
    /// Window width
    #[arg(long, default_value = "240")]
    pub width: u32,
    /// Window height
    #[arg(long, default_value = "100")]
    pub height: u32,
    /// Number of particles in the cloud
    #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(1..))]
    pub particles: u32,
    /// Seed for the palette and particle radii
    #[arg(long)]
    pub seed: Option<u64>,
    /// Horizontal velocity of every particle
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    pub velocity_x: f32,
    /// Vertical velocity of every particle
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    pub velocity_y: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let config = ParticleConfig::new(args.particles as usize, Palette::sparkle(&mut rng))
        .with_velocity(Vec2::new(args.velocity_x, args.velocity_y));
    log::info!(
        "Starting with {} particles, palette {:?}",
        config.count,
        config.palette.colors()
    );

    let app = App::new("sparkle", args.width, args.height, &config, &mut rng)?;
    app.run()
}
