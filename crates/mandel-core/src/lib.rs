pub mod color;
pub mod error;
pub mod escape;
pub mod geometry;
pub mod overlay;
pub mod raster;
pub mod view;

pub use color::{ColorTable, Rgba, INTERIOR};
pub use error::RenderError;
pub use escape::escape_iterations;
pub use geometry::{Dimensions, Point, PointInRect, Real, Rect, Relative, Screen, World};
pub use raster::{CpuBackend, PixelBuffer, Stepping};
pub use view::View;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Something that turns a [`View`] into pixels.
///
/// Every implementation must colour pixel `(px, py)` of a `W×H` target from
/// the escape time of the world point that `(px, py)` maps to when the screen
/// rectangle `{(0, 0), (W, H)}` is mapped onto `view.rect()`. Backends may
/// differ in speed and floating-point precision, never in that mapping.
pub trait RenderBackend {
    /// Where the pixels go.
    type Target: ?Sized;
    type Error: std::error::Error;

    /// Short label for logs and the overlay.
    fn name(&self) -> &'static str;

    fn render(&mut self, view: &View, target: &mut Self::Target) -> Result<(), Self::Error>;
}
