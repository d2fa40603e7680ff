use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

mod app;
mod config;
mod input;

use app::{App, FrameError};
use config::Args;
use input::{Flow, Key};

// ---------------------------------------------------------------------------
// Handler — winit ApplicationHandler
// ---------------------------------------------------------------------------

struct Handler {
    args: Args,
    window: Option<Arc<Window>>,
    app: Option<App>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

impl ApplicationHandler for Handler {
    /// Called once on desktop when the event loop starts.
    /// Creates the window then initialises the renderer.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let mut window_attrs = Window::default_attributes()
            .with_title("Mandelbrot")
            .with_inner_size(winit::dpi::LogicalSize::new(self.args.width, self.args.height));
        if self.args.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window created ({}×{})", size.width, size.height);

        match App::new(Arc::clone(&window), &self.args) {
            Ok(app) => {
                self.window = Some(window);
                self.app = Some(app);
            }
            Err(e) => {
                log::error!("renderer setup failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };

        let flow = match event {
            // ----------------------------------------------------------------
            // Exit
            // ----------------------------------------------------------------
            WindowEvent::CloseRequested => {
                log::info!("Close requested — exiting");
                Flow::Quit
            }

            // ----------------------------------------------------------------
            // Input
            // ----------------------------------------------------------------
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match map_key(code) {
                Some(key) => app.on_key_pressed(key),
                None => Flow::Continue,
            },

            WindowEvent::CursorMoved { position, .. } => app.on_cursor_moved(position.x, position.y),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                app.on_pan_button(state == ElementState::Pressed);
                Flow::Continue
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                app.on_wheel(scroll_y)
            }

            // ----------------------------------------------------------------
            // Resize — reconfigure the wgpu surface
            // ----------------------------------------------------------------
            WindowEvent::Resized(new_size) => {
                app.resize(new_size.width, new_size.height);
                Flow::Continue
            }

            // ----------------------------------------------------------------
            // Redraw — render, overlay, present
            // ----------------------------------------------------------------
            WindowEvent::RedrawRequested => match app.render() {
                Ok(()) => Flow::Continue,
                // Surface lost / outdated: reconfigure and try again next frame.
                Err(FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    if let Some(window) = &self.window {
                        let size = window.inner_size();
                        app.resize(size.width, size.height);
                    }
                    Flow::Continue
                }
                Err(FrameError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("GPU out of memory — exiting");
                    Flow::Quit
                }
                Err(FrameError::Surface(e)) => {
                    log::warn!("render error: {e:?}");
                    Flow::Continue
                }
                Err(e) => {
                    log::error!("{e} — exiting");
                    Flow::Quit
                }
            },

            _ => Flow::Continue,
        };

        if flow == Flow::Quit {
            event_loop.exit();
        }
    }

    /// Drive continuous redraws (game-loop style).
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), winit::error::EventLoopError> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = Handler {
        args,
        window: None,
        app: None,
    };
    event_loop.run_app(&mut handler)
}
