//! Numbers for the diagnostic overlay. Drawing them is somebody else's job.

use std::fmt;
use std::time::{Duration, Instant};

use crate::geometry::{Dimensions, Real, Screen};
use crate::view::View;

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Counts frames and measures wall time since start and since the last frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: u64,
    started: Instant,
    last_frame: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub frame: u64,
    pub elapsed: Duration,
    pub frame_time: Duration,
}

impl FrameTiming {
    /// Instantaneous frame rate, `None` when the frame took no measurable time.
    pub fn fps(&self) -> Option<f64> {
        let secs = self.frame_time.as_secs_f64();
        (secs > 0.0).then(|| 1.0 / secs)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            frame: 0,
            started: now,
            last_frame: now,
        }
    }

    pub fn tick(&mut self) -> FrameTiming {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTiming {
        self.frame += 1;
        let frame_time = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        FrameTiming {
            frame: self.frame,
            elapsed: now.saturating_duration_since(self.started),
            frame_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub resolution: Dimensions<Screen>,
    pub x_range: (Real, Real),
    pub y_range: (Real, Real),
    pub iterations: u32,
    pub frame: u64,
    pub elapsed: Duration,
    pub fps: Option<f64>,
}

impl Overlay {
    pub fn new(view: &View, resolution: Dimensions<Screen>, timing: FrameTiming) -> Self {
        Self {
            resolution,
            x_range: view.x_range(),
            y_range: view.y_range(),
            iterations: view.iterations(),
            frame: timing.frame,
            elapsed: timing.elapsed,
            fps: timing.fps(),
        }
    }

    /// Single-line form, short enough for a window title.
    pub fn summary(&self) -> String {
        let fps = match self.fps {
            Some(fps) => format!("{fps:.1} fps"),
            None => "-- fps".to_string(),
        };
        format!(
            "x [{:.6}, {:.6}]  y [{:.6}, {:.6}]  iterations {}  {}",
            self.x_range.0, self.x_range.1, self.y_range.0, self.y_range.1, self.iterations, fps
        )
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "screen res = {}", self.resolution)?;
        writeln!(f, "view space:")?;
        writeln!(f, "    x = [{}, {}]", self.x_range.0, self.x_range.1)?;
        writeln!(f, "    y = [{}, {}]", self.y_range.0, self.y_range.1)?;
        writeln!(f, "iterations = {}", self.iterations)?;
        writeln!(f, "frame = {}", self.frame)?;
        writeln!(f, "elapsed = {:.3} s", self.elapsed.as_secs_f64())?;
        match self.fps {
            Some(fps) => writeln!(f, "cur. FPS = {fps:.1} frames/sec"),
            None => writeln!(f, "cur. FPS = -- frames/sec"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_frames_and_times() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let first = clock.tick_at(t0 + Duration::from_millis(20));
        assert_eq!(first.frame, 1);
        assert_eq!(first.frame_time, Duration::from_millis(20));

        let second = clock.tick_at(t0 + Duration::from_millis(70));
        assert_eq!(second.frame, 2);
        assert_eq!(second.elapsed, Duration::from_millis(70));
        assert_eq!(second.frame_time, Duration::from_millis(50));
        let fps = second.fps().expect("non-zero frame time");
        assert!((fps - 20.0).abs() < 1e-9, "fps={fps}");
    }

    #[test]
    fn zero_frame_time_has_no_fps() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert_eq!(clock.tick_at(t0).fps(), None);
    }

    #[test]
    fn overlay_reads_view() {
        let t0 = Instant::now();
        let timing = FrameClock::starting_at(t0).tick_at(t0 + Duration::from_millis(100));
        let overlay = Overlay::new(&View::new(), Dimensions::new(1024, 768), timing);

        assert_eq!(overlay.x_range, (-2.5, 1.0));
        assert_eq!(overlay.y_range, (-1.0, 1.0));
        assert_eq!(overlay.iterations, 16);
        assert_eq!(overlay.frame, 1);

        let text = overlay.to_string();
        assert!(text.starts_with("screen res = 1024x768\n"), "{text}");
        assert!(text.contains("    x = [-2.5, 1]\n"), "{text}");
        assert!(text.contains("iterations = 16\n"), "{text}");
        assert!(text.contains("cur. FPS = 10.0 frames/sec"), "{text}");
    }

    #[test]
    fn summary_is_one_line() {
        let t0 = Instant::now();
        let timing = FrameClock::starting_at(t0).tick_at(t0);
        let summary = Overlay::new(&View::new(), Dimensions::new(64, 64), timing).summary();
        assert!(!summary.contains('\n'));
        assert!(summary.contains("iterations 16"), "{summary}");
        assert!(summary.ends_with("-- fps"), "{summary}");
    }
}
