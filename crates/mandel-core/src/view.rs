use crate::color::{ColorTable, Rgba};
use crate::geometry::{Dimensions, Point, Real, Rect, Screen, World};

pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 1024;
pub const DEFAULT_ITERATIONS: u32 = 16;

/// Zoom factor for one wheel step toward the viewer.
pub const ZOOM_IN: Real = 0.9;
/// Reciprocal of [`ZOOM_IN`], so one step in and one out cancel.
pub const ZOOM_OUT: Real = 1.0 / ZOOM_IN;

/// World window shown at startup and after a reset: the whole set at an
/// aspect of 1.75.
pub const INITIAL_RECT: Rect<World> = Rect::new(
    Point::new(-2.5, -1.0),
    Dimensions::new(3.5, 2.0),
);

/// Clamps an iteration budget into `[MIN_ITERATIONS, MAX_ITERATIONS]`.
pub fn clamp_iterations(iterations: u32) -> u32 {
    iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS)
}

/// Interactive state: the visible world window, the iteration budget and the
/// colour table that goes with it.
#[derive(Debug, Clone)]
pub struct View {
    rect: Rect<World>,
    iterations: u32,
    colors: ColorTable,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self::with_rect(INITIAL_RECT, DEFAULT_ITERATIONS)
    }

    /// A view over an arbitrary world window. The budget is clamped.
    ///
    /// # Panics
    ///
    /// Panics if `rect` has a zero or negative extent.
    pub fn with_rect(rect: Rect<World>, iterations: u32) -> Self {
        assert!(
            rect.size.is_positive(),
            "View::with_rect: degenerate world rect {rect:?}"
        );
        let iterations = clamp_iterations(iterations);
        Self {
            rect,
            iterations,
            colors: ColorTable::new(iterations),
        }
    }

    pub fn rect(&self) -> Rect<World> {
        self.rect
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sets the budget, clamped, and rebuilds the colour table before
    /// returning. Returns the effective budget.
    pub fn set_iterations(&mut self, iterations: u32) -> u32 {
        let clamped = clamp_iterations(iterations);
        if clamped != self.iterations {
            self.iterations = clamped;
            self.colors = ColorTable::new(clamped);
            log::debug!("iterations → {clamped}");
        }
        self.iterations
    }

    pub fn increase_detail(&mut self) -> u32 {
        self.set_iterations(self.iterations.saturating_mul(2))
    }

    pub fn decrease_detail(&mut self) -> u32 {
        self.set_iterations(self.iterations / 2)
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn color(&self, iterations: u32) -> Rgba {
        self.colors.color(iterations)
    }

    /// Restores [`INITIAL_RECT`]; the budget is left alone.
    pub fn reset(&mut self) {
        self.rect = INITIAL_RECT;
        log::debug!("view reset");
    }

    /// Translates the world window by a screen-space delta.
    ///
    /// `delta` is in pixels of a render target of size `screen`; it is scaled
    /// into world units and added to the window position. To make the
    /// picture follow a dragged pointer, pass the negated pointer motion.
    pub fn pan(&mut self, delta: Point<Screen>, screen: Dimensions<Screen>) {
        let world_delta = delta
            .within(Rect::from_size(screen))
            .map(Rect::from_size(self.rect.size));
        self.rect.pos += world_delta;
    }

    /// Zooms by `factor` around the world point under `at`.
    pub fn zoom_at(&mut self, at: Point<Screen>, screen: Dimensions<Screen>, factor: Real) {
        let anchor = at.within(Rect::from_size(screen)).map_into(self.rect);
        self.rect = anchor.zoom(factor).rect;
        log::debug!(
            "zoom ×{factor:.4} at ({}) → {}x{}",
            anchor.point,
            self.rect.size.w,
            self.rect.size.h
        );
    }

    /// World point under the pixel `at` of a `screen`-sized target.
    pub fn screen_to_world(&self, at: Point<Screen>, screen: Dimensions<Screen>) -> Point<World> {
        at.within(Rect::from_size(screen)).map(self.rect)
    }

    pub fn x_range(&self) -> (Real, Real) {
        (self.rect.pos.x, self.rect.end().x)
    }

    pub fn y_range(&self) -> (Real, Real) {
        (self.rect.pos.y, self.rect.end().y)
    }
}
