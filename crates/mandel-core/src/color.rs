use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel, laid out the way an `Rgba8Unorm` texture expects it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::gray(0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray of the given brightness.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level, 0xff)
    }
}

/// Colour of points that never escaped within the budget.
pub const INTERIOR: Rgba = Rgba::BLACK;

/// Number of significant bits in `n`; `bit_length(0) == 0`.
pub fn bit_length(n: u32) -> u32 {
    u32::BITS - n.leading_zeros()
}

/// Left shift applied to iteration counts before they wrap into a brightness.
///
/// Small budgets are stretched so the few available levels still span the
/// gray range; above 256 every level gets its own brightness and the ramp
/// wraps.
pub fn brightness_shift(budget: u32) -> u32 {
    if budget <= 256 {
        7.min(9 - bit_length(budget))
    } else {
        0
    }
}

/// Iteration count → display colour, rebuilt whenever the budget changes.
///
/// Holds `budget + 1` entries: a brightness ramp for `0..budget` and the
/// [`INTERIOR`] colour at index `budget`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    entries: Vec<Rgba>,
}

impl ColorTable {
    pub fn new(budget: u32) -> Self {
        let shift = brightness_shift(budget);
        let mut entries = Vec::with_capacity(budget as usize + 1);
        entries.extend((0..budget).map(|i| Rgba::gray(((i << shift) & 0xff) as u8)));
        entries.push(INTERIOR);
        Self { entries }
    }

    /// The iteration budget this table was built for.
    pub fn budget(&self) -> u32 {
        (self.entries.len() - 1) as u32
    }

    /// # Panics
    ///
    /// Panics if `iterations` exceeds the budget.
    pub fn color(&self, iterations: u32) -> Rgba {
        self.entries[iterations as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
