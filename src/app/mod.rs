use glam::Vec2;
use rand::Rng;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use crate::{
    core::{particles::ParticleConfig, time::Time},
    renderer::{FrameOutcome, ParticleCloud, WgpuBackend},
};

use self::button::ShinyButton;

pub mod button;
pub mod gesture;

/// A window hosting a single shiny button.
pub struct App {
    event_loop: EventLoop<()>,
    // declared before `window`: the surface must go first
    cloud: ParticleCloud<WgpuBackend>,
    window: Window,
}

impl App {
    pub fn new(
        title: impl Into<String>,
        width: u32,
        height: u32,
        config: &ParticleConfig,
        rng: &mut impl Rng,
    ) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(width as f64, height as f64))
            .with_transparent(true)
            .build(&event_loop)?;

        let backend = WgpuBackend::new(&window)?;
        let cloud = ParticleCloud::new(backend, config, rng)?;

        Ok(Self {
            event_loop,
            cloud,
            window,
        })
    }

    pub fn run(self) -> anyhow::Result<()> {
        let App {
            event_loop,
            mut cloud,
            window,
        } = self;

        let size = window.inner_size();
        let mut button = ShinyButton::new(
            cloud.control(),
            Vec2::new(size.width as f32, size.height as f32),
        );
        let mut cursor = Vec2::ZERO;
        let mut time = Time::new();

        event_loop.run(|event, target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    cloud.teardown();
                    target.exit();
                }
                WindowEvent::Resized(size) => {
                    cloud.drawable_size_changed(size.width, size.height);
                    button.set_bounds(Vec2::new(size.width as f32, size.height as f32));
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Vec2::new(position.x as f32, position.y as f32);
                    if button.is_pressed() {
                        button.drag(cursor);
                    }
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    match state {
                        ElementState::Pressed => button.press(cursor),
                        ElementState::Released => button.release(),
                    }
                    time.update();
                    window.request_redraw();
                }
                WindowEvent::CursorLeft { .. } => button.release(),
                WindowEvent::RedrawRequested => {
                    time.update();
                    button.tick(time.delta_time);

                    window.pre_present_notify();
                    if cloud.redraw() == FrameOutcome::Skipped {
                        log::trace!("Frame skipped, retrying on the next tick");
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if cloud.is_torn_down() {
                    return;
                }
                if !cloud.is_paused() || button.is_animating() {
                    window.request_redraw();
                    target.set_control_flow(ControlFlow::Poll);
                } else {
                    target.set_control_flow(ControlFlow::Wait);
                }
            }
            Event::LoopExiting => cloud.teardown(),
            _ => {}
        })?;

        drop(cloud);
        drop(window);

        Ok(())
    }
}
