use std::sync::Arc;
use std::time::{Duration, Instant};

use mandel_core::overlay::{FrameClock, Overlay};
use mandel_core::{CpuBackend, Dimensions, PixelBuffer, Point, RenderBackend, RenderError, Screen, View};
use mandel_gpu::{GpuBackend, GpuContext, GpuError, TexturePresenter};
use thiserror::Error;
use winit::window::Window;

use crate::config::{Args, BackendKind};
use crate::input::{apply, Command, Flow, InputState, Key};

/// How often the overlay summary is pushed to the window title.
const OVERLAY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error(transparent)]
    Raster(#[from] RenderError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

// ---------------------------------------------------------------------------
// Backend — chosen once at startup
// ---------------------------------------------------------------------------

enum Backend {
    Cpu {
        raster: CpuBackend,
        buffer: PixelBuffer,
        presenter: TexturePresenter,
    },
    Gpu(GpuBackend),
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Cpu { raster, .. } => raster.name(),
            Backend::Gpu(gpu) => gpu.name(),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    ctx: GpuContext,
    surface_config: wgpu::SurfaceConfiguration,

    backend: Backend,
    view: View,
    input: InputState,

    clock: FrameClock,
    last_overlay: Instant,
}

impl App {
    /// Initialise wgpu and the selected backend for a given window.  The
    /// window is wrapped in `Arc` so that the surface can safely hold a
    /// `'static` reference to it.
    pub fn new(window: Arc<Window>, args: &Args) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // ---- Instance / Surface / Device ------------------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;
        let ctx = pollster::block_on(GpuContext::new(&instance, Some(&surface)))?;

        // ---- Surface configuration ------------------------------------------
        let format = ctx.surface_format(&surface)?;
        let caps = surface.get_capabilities(&ctx.adapter);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &surface_config);
        log::info!("Surface configured: {width}×{height} {format:?} Fifo");

        // ---- Backend --------------------------------------------------------
        let backend = match args.backend {
            BackendKind::Cpu => Backend::Cpu {
                raster: CpuBackend::new(args.stepping.into()),
                buffer: PixelBuffer::new(screen_dimensions(width, height)),
                presenter: TexturePresenter::new(&ctx, format)?,
            },
            BackendKind::Gpu => Backend::Gpu(GpuBackend::new(&ctx, format)?),
        };
        log::info!("Rendering with the {} backend", backend.name());

        let mut view = View::new();
        view.set_iterations(args.initial_iterations());

        Ok(Self {
            window,
            surface,
            ctx,
            surface_config,
            backend,
            view,
            input: InputState::new(),
            clock: FrameClock::new(),
            last_overlay: Instant::now(),
        })
    }

    pub fn screen(&self) -> Dimensions<Screen> {
        screen_dimensions(self.surface_config.width, self.surface_config.height)
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Reconfigure the surface and the size-dependent backend resources.
    /// The world window is kept, so the picture stretches with the window.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.ctx.device, &self.surface_config);

        if let Backend::Cpu { buffer, .. } = &mut self.backend {
            buffer.resize(screen_dimensions(new_width, new_height));
        }

        log::debug!("Surface resized to {new_width}×{new_height}");
    }

    // -------------------------------------------------------------------------
    // Input — called by main.rs window_event handler
    // -------------------------------------------------------------------------

    pub fn on_key_pressed(&mut self, key: Key) -> Flow {
        match self.input.on_key(key) {
            Some(command) => self.handle_command(command),
            None => Flow::Continue,
        }
    }

    /// Track the cursor position in physical pixels.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Flow {
        let position = Point::new(x as i32, y as i32);
        match self.input.on_cursor_moved(position) {
            Some(command) => self.handle_command(command),
            None => Flow::Continue,
        }
    }

    pub fn on_pan_button(&mut self, pressed: bool) {
        self.input.on_pan_button(pressed);
    }

    pub fn on_wheel(&mut self, scroll_y: f32) -> Flow {
        match self.input.on_wheel(scroll_y) {
            Some(command) => self.handle_command(command),
            None => Flow::Continue,
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        let screen = self.screen();
        apply(&mut self.view, command, screen)
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Run one frame: render, compose the overlay, present.
    pub fn render(&mut self) -> Result<(), FrameError> {
        let output = self.surface.get_current_texture()?;
        let mut target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        match &mut self.backend {
            Backend::Cpu {
                raster,
                buffer,
                presenter,
            } => {
                raster.render(&self.view, buffer)?;
                presenter.present(buffer, &target);
            }
            Backend::Gpu(gpu) => gpu.render(&self.view, &mut target)?,
        }

        self.compose_overlay();
        output.present();
        Ok(())
    }

    fn compose_overlay(&mut self) {
        let timing = self.clock.tick();
        if self.last_overlay.elapsed() < OVERLAY_INTERVAL {
            return;
        }
        self.last_overlay = Instant::now();

        let overlay = Overlay::new(&self.view, self.screen(), timing);
        self.window
            .set_title(&format!("Mandelbrot [{}]  {}", self.backend.name(), overlay.summary()));
        log::debug!("\n{overlay}");
    }
}

fn screen_dimensions(width: u32, height: u32) -> Dimensions<Screen> {
    Dimensions::new(width as i32, height as i32)
}
