use clap::{Parser, ValueEnum};
use mandel_core::view::{clamp_iterations, DEFAULT_ITERATIONS};
use mandel_core::Stepping;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Software raster into a pixel buffer, uploaded each frame
    Cpu,
    /// Fragment shader fed with view uniforms
    Gpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StepMode {
    /// Add a fixed world step per pixel (fast, accumulates rounding)
    Incremental,
    /// Map every pixel independently
    Exact,
}

impl From<StepMode> for Stepping {
    fn from(mode: StepMode) -> Self {
        match mode {
            StepMode::Incremental => Stepping::Incremental,
            StepMode::Exact => Stepping::Exact,
        }
    }
}

/// Interactive Mandelbrot explorer.
///
/// Drag with the left button to pan, scroll to zoom, Up/Down to change the
/// iteration budget, R to reset, Escape or Q to quit. Set RUST_LOG for logs.
#[derive(Debug, Parser)]
#[command(name = "mandelbrot", version)]
pub struct Args {
    /// Rendering backend, chosen once at startup
    #[arg(long, value_enum, default_value_t = BackendKind::Cpu)]
    pub backend: BackendKind,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// Cover the whole desktop
    #[arg(long)]
    pub fullscreen: bool,

    /// Initial iteration budget, clamped to [1, 1024]
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// How the software raster walks world space
    #[arg(long, value_enum, default_value_t = StepMode::Incremental)]
    pub stepping: StepMode,
}

impl Args {
    pub fn initial_iterations(&self) -> u32 {
        clamp_iterations(self.iterations)
    }
}
