pub mod config;
pub mod creature;
pub mod error;
pub mod monitor;
mod renderer;
pub mod surface;
mod texture;
pub mod types;

pub use config::Config;
pub use creature::{Creature, CreatureState};
pub use error::{Error, Result};
pub use glam::IVec2;
pub use monitor::{Monitor, resolve};
pub use surface::{PresentationSurface, RenderCommand};
pub use texture::SpriteImage;
pub use types::{Dimension, Rect};

use std::sync::Arc;

use tracing::{info, warn};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Opens the creature window and runs the tick loop until the window is
/// closed or Escape is pressed.
pub fn run(config: &Config) -> Result<()> {
    let sprite = SpriteImage::open(&config.sprite)?;
    let size = sprite.dimension();
    info!(
        sprite = %config.sprite.display(),
        width = size.width,
        height = size.height,
        x = config.start_x,
        y = config.start_y,
        "starting"
    );

    let event_loop = winit::event_loop::EventLoop::new()?;
    let mut app = Handler {
        state: None,
        sprite,
        creature: Creature::at(config.start(), size),
        title: &config.title,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    info!(ticks = app.creature.state().tick_count, "stopped");
    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// The creature's window: a borderless, transparent, always-on-top window
/// exactly as large as the sprite.
struct State {
    window: Arc<winit::window::Window>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,

    sprite_renderer: renderer::SpriteRenderer,
    sprite_texture: texture::SpriteTexture,

    // last position handed to the window system
    placed: Option<IVec2>,
}

impl State {
    async fn new(window: Arc<winit::window::Window>, sprite: &SpriteImage) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;
        info!(adapter = %adapter.get_info().name, "graphics adapter selected");

        // transparent sprite border, when the adapter has it
        let required_features =
            adapter.features() & wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features,
                ..Default::default()
            })
            .await?;

        // surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .unwrap_or(surface_caps.alpha_modes[0]);

        let size = window.inner_size();
        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 1,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_configuration);

        let bind_group_layout = texture::SpriteTexture::bind_group_layout(&device);
        let sprite_texture =
            texture::SpriteTexture::upload(&device, &queue, sprite, &bind_group_layout);
        let sprite_renderer =
            renderer::SpriteRenderer::new(&device, surface_format, &bind_group_layout);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_configuration,
            sprite_renderer,
            sprite_texture,
            placed: None,
        })
    }

    fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            self.sprite_renderer
                .draw(&mut render_pass, &self.sprite_texture);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.surface_configuration.width = size.width.max(1);
        self.surface_configuration.height = size.height.max(1);
        self.surface
            .configure(&self.device, &self.surface_configuration);
    }
}

impl PresentationSurface for State {
    fn query_monitors(&self) -> Vec<Monitor> {
        monitor::query(&self.window)
    }

    fn set_window_position(&mut self, position: IVec2) {
        self.window
            .set_outer_position(winit::dpi::PhysicalPosition::new(position.x, position.y));
        self.placed = Some(position);
    }

    fn present(&mut self, command: &RenderCommand) -> Result<()> {
        // landing clamps move the creature without pushing a position
        if self.placed != Some(command.position) {
            self.set_window_position(command.position);
        }

        match self.render() {
            Ok(()) => Ok(()),
            Err(error @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!(%error, "surface needs reconfiguring");
                self.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("frame timed out, skipping");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }
}

struct Handler<'a> {
    state: Option<State>,
    sprite: SpriteImage,
    creature: Creature,
    title: &'a str,
    error: Option<Error>,
}

impl Handler<'_> {
    fn open_window(&self, event_loop: &winit::event_loop::ActiveEventLoop) -> Result<State> {
        let size = self.creature.state().size();
        let position = self.creature.state().position;
        let attributes = winit::window::Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                size.width as u32,
                size.height as u32,
            ))
            .with_position(winit::dpi::PhysicalPosition::new(position.x, position.y))
            .with_transparent(true)
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(winit::window::WindowLevel::AlwaysOnTop);
        let window = Arc::new(event_loop.create_window(attributes)?);

        pollster::block_on(State::new(window, &self.sprite))
    }

    fn fail(&mut self, event_loop: &winit::event_loop::ActiveEventLoop, error: Error) {
        self.error = Some(error);
        event_loop.exit();
    }
}

impl winit::application::ApplicationHandler for Handler<'_> {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.open_window(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            winit::event::WindowEvent::CloseRequested => event_loop.exit(),
            winit::event::WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                event_loop.exit()
            }
            winit::event::WindowEvent::RedrawRequested => {
                let command = self.creature.tick(state);
                if let Err(error) = state.present(&command) {
                    self.fail(event_loop, error);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
