pub mod app;
pub mod core;
pub mod renderer;

pub mod prelude {
    pub use crate::app::{button::ShinyButton, gesture::DragGesture, App};
    pub use crate::core::{
        animation::ProgressAnimator,
        color::Palette,
        control::{ControlState, ControlSurface},
        particles::{ParticleCloudParameters, ParticleConfig, ParticleState},
        time::Time,
    };
    pub use crate::renderer::{
        Backend, FrameOutcome, ParticleCloud, StartupError, WgpuBackend,
    };
}
