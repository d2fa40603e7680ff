//! Software rasterizer: evaluates the escape time for every pixel of a
//! [`PixelBuffer`] on the CPU.

use std::slice::ChunksExactMut;

use crate::color::Rgba;
use crate::error::RenderError;
use crate::escape::escape_iterations;
use crate::geometry::{Dimensions, Point, Rect, Screen, World};
use crate::view::View;
use crate::RenderBackend;

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// Row-major RGBA destination for the software path, origin top-left.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    size: Dimensions<Screen>,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// # Panics
    ///
    /// Panics if `size` has a zero or negative extent.
    pub fn new(size: Dimensions<Screen>) -> Self {
        assert!(size.is_positive(), "PixelBuffer: degenerate size {size}");
        Self {
            size,
            pixels: Vec::new(),
        }
    }

    pub fn size(&self) -> Dimensions<Screen> {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.w as u32
    }

    pub fn height(&self) -> u32 {
        self.size.h as u32
    }

    /// Records a new size. Storage follows on the next [`lock`](Self::lock).
    ///
    /// # Panics
    ///
    /// Panics if `size` has a zero or negative extent.
    pub fn resize(&mut self, size: Dimensions<Screen>) {
        assert!(size.is_positive(), "PixelBuffer: degenerate size {size}");
        self.size = size;
    }

    /// Pixels of the last completed raster. Empty until the first lock, and
    /// stale after a resize until the next one.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixels
            .get(y as usize * self.width() as usize + x as usize)
            .copied()
    }

    /// Acquires exclusive write access for one raster, allocating storage
    /// for the current size if needed.
    pub fn lock(&mut self) -> Result<PixelLock<'_>, RenderError> {
        let len = self.size.area();
        if self.pixels.len() != len {
            self.pixels.clear();
            self.pixels
                .try_reserve_exact(len)
                .map_err(|source| RenderError::Allocation {
                    size: self.size,
                    source,
                })?;
            self.pixels.resize(len, Rgba::BLACK);
        }
        Ok(PixelLock {
            width: self.size.w as usize,
            pixels: &mut self.pixels,
        })
    }
}

/// Exclusive write access to a [`PixelBuffer`], held for one raster.
pub struct PixelLock<'a> {
    width: usize,
    pixels: &'a mut [Rgba],
}

impl PixelLock<'_> {
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, Rgba> {
        self.pixels.chunks_exact_mut(self.width)
    }
}

// ---------------------------------------------------------------------------
// CpuBackend
// ---------------------------------------------------------------------------

/// How the raster walks world space from pixel to pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stepping {
    /// Adds a fixed per-pixel world step. Faster; rounding error accumulates
    /// along each row and down the columns.
    #[default]
    Incremental,
    /// Maps every pixel through the view rectangle independently.
    Exact,
}

#[derive(Debug, Clone, Default)]
pub struct CpuBackend {
    pub stepping: Stepping,
}

impl CpuBackend {
    pub fn new(stepping: Stepping) -> Self {
        Self { stepping }
    }
}

impl RenderBackend for CpuBackend {
    type Target = PixelBuffer;
    type Error = RenderError;

    fn name(&self) -> &'static str {
        match self.stepping {
            Stepping::Incremental => "cpu",
            Stepping::Exact => "cpu (exact)",
        }
    }

    fn render(&mut self, view: &View, target: &mut PixelBuffer) -> Result<(), RenderError> {
        let screen = target.size();
        let iterations = view.iterations();
        let colors = view.colors();
        let mut lock = target.lock()?;

        walk_pixels(view.rect(), screen, self.stepping, lock.rows_mut(), |c| {
            colors.color(escape_iterations(c.x, c.y, iterations))
        });
        Ok(())
    }
}

/// Calls `shade` with the world coordinate of every pixel, row by row, and
/// stores the result.
fn walk_pixels<'a>(
    world: Rect<World>,
    screen: Dimensions<Screen>,
    stepping: Stepping,
    rows: impl Iterator<Item = &'a mut [Rgba]>,
    mut shade: impl FnMut(Point<World>) -> Rgba,
) {
    let screen_rect = Rect::from_size(screen);
    match stepping {
        Stepping::Incremental => {
            let origin = world.pos;
            let step = Point::<Screen>::new(1, 1).within(screen_rect).map(world) - origin;
            let mut c = origin;
            for row in rows {
                c.x = origin.x;
                for px in row.iter_mut() {
                    *px = shade(c);
                    c.x += step.x;
                }
                c.y += step.y;
            }
        }
        Stepping::Exact => {
            for (y, row) in rows.enumerate() {
                for (x, px) in row.iter_mut().enumerate() {
                    let p = Point::<Screen>::new(x as i32, y as i32);
                    *px = shade(p.within(screen_rect).map(world));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::INTERIOR;
    use crate::escape::escape_iterations_at;
    use crate::geometry::Real;
    use crate::view::INITIAL_RECT;

    fn dims(w: i32, h: i32) -> Dimensions<Screen> {
        Dimensions::new(w, h)
    }

    /// World coordinates the walker visits, in raster order.
    fn visited(world: Rect<World>, screen: Dimensions<Screen>, stepping: Stepping) -> Vec<Point<World>> {
        let mut out = Vec::new();
        let mut scratch = vec![Rgba::BLACK; screen.area()];
        let rows = scratch.chunks_exact_mut(screen.w as usize);
        walk_pixels(world, screen, stepping, rows, |c| {
            out.push(c);
            Rgba::BLACK
        });
        out
    }

    // --- PixelBuffer ------------------------------------------------------------

    #[test]
    fn buffer_storage_arrives_on_lock() {
        let mut buf = PixelBuffer::new(dims(8, 4));
        assert!(buf.pixels().is_empty());
        assert_eq!(buf.pixel(0, 0), None);
        {
            let mut lock = buf.lock().expect("lock");
            assert_eq!(lock.rows_mut().count(), 4);
        }
        assert_eq!(buf.pixels().len(), 32);
        assert_eq!(buf.pixel(7, 3), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(8, 0), None);
    }

    #[test]
    fn buffer_resize_reallocates_on_next_lock() {
        let mut buf = PixelBuffer::new(dims(8, 4));
        buf.lock().expect("lock");
        buf.resize(dims(3, 2));
        assert_eq!(buf.pixels().len(), 32);
        buf.lock().expect("lock");
        assert_eq!(buf.pixels().len(), 6);
        assert_eq!((buf.width(), buf.height()), (3, 2));
    }

    #[test]
    #[should_panic(expected = "degenerate")]
    fn buffer_rejects_empty_size() {
        PixelBuffer::new(dims(0, 10));
    }

    // --- walking ------------------------------------------------------------------

    #[test]
    fn first_pixel_is_rect_origin() {
        for stepping in [Stepping::Incremental, Stepping::Exact] {
            let pts = visited(INITIAL_RECT, dims(35, 20), stepping);
            assert_eq!(pts.len(), 700);
            assert_eq!(pts[0], INITIAL_RECT.pos);
        }
    }

    #[test]
    fn incremental_matches_exact_within_drift() {
        let screen = dims(64, 48);
        let inc = visited(INITIAL_RECT, screen, Stepping::Incremental);
        let exact = visited(INITIAL_RECT, screen, Stepping::Exact);
        assert_eq!(inc.len(), exact.len());
        for (a, b) in inc.iter().zip(&exact) {
            assert!((a.x - b.x).abs() < 1e-12, "{a} vs {b}");
            assert!((a.y - b.y).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn per_pixel_step_matches_rect_over_screen() {
        let pts = visited(INITIAL_RECT, dims(100, 100), Stepping::Exact);
        let dx: Real = pts[1].x - pts[0].x;
        let dy: Real = pts[100].y - pts[0].y;
        assert!((dx - 0.035).abs() < 1e-12);
        assert!((dy - 0.02).abs() < 1e-12);
    }

    // --- rendering ----------------------------------------------------------------

    #[test]
    fn interior_window_renders_black() {
        let view = View::with_rect(
            Rect::new(Point::new(-0.1, -0.1), Dimensions::new(0.2, 0.2)),
            64,
        );
        let mut buf = PixelBuffer::new(dims(16, 16));
        CpuBackend::default().render(&view, &mut buf).expect("render");
        assert!(buf.pixels().iter().all(|&px| px == INTERIOR));
    }

    #[test]
    fn exact_render_colours_every_pixel_from_its_world_point() {
        let view = View::new();
        let screen = dims(40, 30);
        let mut buf = PixelBuffer::new(screen);
        CpuBackend::new(Stepping::Exact)
            .render(&view, &mut buf)
            .expect("render");

        for y in 0..30 {
            for x in 0..40 {
                let c = view.screen_to_world(Point::new(x, y), screen);
                let expected = view.color(escape_iterations_at(c, view.iterations()));
                assert_eq!(buf.pixel(x as u32, y as u32), Some(expected), "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn render_picks_up_new_budget() {
        let mut view = View::with_rect(
            Rect::new(Point::new(1.5, 0.0), Dimensions::new(1e-6, 1e-6)),
            16,
        );
        let mut buf = PixelBuffer::new(dims(2, 2));
        let mut backend = CpuBackend::default();

        backend.render(&view, &mut buf).expect("render");
        assert_eq!(buf.pixel(0, 0), Some(Rgba::gray(16)));

        view.set_iterations(256);
        backend.render(&view, &mut buf).expect("render");
        assert_eq!(buf.pixel(0, 0), Some(Rgba::gray(1)));
    }

    #[test]
    fn backend_names() {
        assert_eq!(CpuBackend::new(Stepping::Incremental).name(), "cpu");
        assert_eq!(CpuBackend::new(Stepping::Exact).name(), "cpu (exact)");
    }
}
