use mandel_core::view::{ZOOM_IN, ZOOM_OUT};
use mandel_core::{Dimensions, Point, Screen, View};

// ---------------------------------------------------------------------------
// Key — windowing-library-independent key representation
// ---------------------------------------------------------------------------

/// A keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::PhysicalKey` → `Key`; everything else
/// in the input pipeline works purely with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    R,
    Q,
    Escape,
}

// ---------------------------------------------------------------------------
// Command — what the viewer does in response to input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Reset,
    IncreaseDetail,
    DecreaseDetail,
    /// Zoom around a screen point, in when `zoom_in`, out otherwise.
    Zoom { at: Point<Screen>, zoom_in: bool },
    /// Pointer motion in pixels while the drag button is held.
    Pan { delta: Point<Screen> },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Tracks the pointer and drag state between events.
#[derive(Debug, Default)]
pub struct InputState {
    cursor: Point<Screen>,
    dragging: bool,
    /// Last motion sample of the current drag. `None` until the first sample
    /// after the button went down, which only sets the baseline.
    drag_anchor: Option<Point<Screen>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Point<Screen> {
        self.cursor
    }

    /// Translate a `Key` press into a `Command`.
    pub fn on_key(&self, key: Key) -> Option<Command> {
        match key {
            Key::Up => Some(Command::IncreaseDetail),
            Key::Down => Some(Command::DecreaseDetail),
            Key::R => Some(Command::Reset),
            Key::Q | Key::Escape => Some(Command::Quit),
        }
    }

    /// Start or end a drag with the pan button.
    pub fn on_pan_button(&mut self, pressed: bool) {
        self.dragging = pressed;
        self.drag_anchor = None;
    }

    /// Record a pointer position; yields a pan while dragging, except for the
    /// first sample of each drag.
    pub fn on_cursor_moved(&mut self, position: Point<Screen>) -> Option<Command> {
        self.cursor = position;
        if !self.dragging {
            return None;
        }
        let previous = self.drag_anchor.replace(position)?;
        let delta = position - previous;
        (delta != Point::origin()).then_some(Command::Pan { delta })
    }

    /// Vertical wheel motion zooms at the cursor. Positive scrolls in.
    pub fn on_wheel(&self, scroll_y: f32) -> Option<Command> {
        if scroll_y == 0.0 {
            return None;
        }
        Some(Command::Zoom {
            at: self.cursor,
            zoom_in: scroll_y > 0.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Applying commands
// ---------------------------------------------------------------------------

/// Apply a command to the view of a `screen`-sized target.
pub fn apply(view: &mut View, command: Command, screen: Dimensions<Screen>) -> Flow {
    match command {
        Command::Reset => {
            log::info!("Reset view");
            view.reset();
        }
        Command::IncreaseDetail => {
            let iterations = view.increase_detail();
            log::info!("iterations → {iterations}");
        }
        Command::DecreaseDetail => {
            let iterations = view.decrease_detail();
            log::info!("iterations → {iterations}");
        }
        Command::Zoom { at, zoom_in } => {
            let factor = if zoom_in { ZOOM_IN } else { ZOOM_OUT };
            view.zoom_at(at, screen, factor);
        }
        // The window moves opposite to the pointer so the picture follows it.
        Command::Pan { delta } => view.pan(-delta, screen),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
