//! Unit-tagged points and rectangles, and the three mapping primitives the
//! rest of the viewer is built on: [`PointInRect::relative_position`],
//! [`PointInRect::map`] and [`PointInRect::zoom`].
//!
//! Every coordinate carries a unit tag. Screen space is integral pixels,
//! world space is real-valued, and the only way to move a point from one to
//! the other is through `map`.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Real number type used for world-space coordinates.
pub type Real = f64;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Numeric component type of a coordinate space.
pub trait Scalar:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;

    fn to_real(self) -> Real;

    /// Converts back from a real value. Integral scalars truncate toward zero.
    fn from_real(value: Real) -> Self;
}

impl Scalar for i32 {
    const ZERO: Self = 0;

    fn to_real(self) -> Real {
        self as Real
    }

    fn from_real(value: Real) -> Self {
        value as i32
    }
}

impl Scalar for Real {
    const ZERO: Self = 0.0;

    fn to_real(self) -> Real {
        self
    }

    fn from_real(value: Real) -> Self {
        value
    }
}

/// Tag for a coordinate space. The associated scalar fixes the component type.
pub trait Unit: Copy + fmt::Debug + PartialEq + Default + 'static {
    type Scalar: Scalar;
}

/// Integer pixel coordinates of a render target, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Screen;

/// The real plane the fractal lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct World;

/// Unitless fractions of a rectangle; `[0, 1]` inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relative;

impl Unit for Screen {
    type Scalar = i32;
}

impl Unit for World {
    type Scalar = Real;
}

impl Unit for Relative {
    type Scalar = Real;
}

// ---------------------------------------------------------------------------
// Point / Dimensions / Rect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<U: Unit> {
    pub x: U::Scalar,
    pub y: U::Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions<U: Unit> {
    pub w: U::Scalar,
    pub h: U::Scalar,
}

/// Axis-aligned box; `pos` is the minimum (top-left) corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<U: Unit> {
    pub pos: Point<U>,
    pub size: Dimensions<U>,
}

/// A point together with the rectangle it is expressed relative to.
///
/// Only the input and output shape of the mapping operations; nothing keeps
/// one of these around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointInRect<U: Unit> {
    pub point: Point<U>,
    pub rect: Rect<U>,
}

impl<U: Unit> Point<U> {
    pub const fn new(x: U::Scalar, y: U::Scalar) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(U::Scalar::ZERO, U::Scalar::ZERO)
    }

    /// Pairs this point with the rectangle it should be read against.
    pub fn within(self, rect: Rect<U>) -> PointInRect<U> {
        PointInRect { point: self, rect }
    }
}

impl<U: Unit> Default for Point<U> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<U: Unit> Dimensions<U> {
    pub const fn new(w: U::Scalar, h: U::Scalar) -> Self {
        Self { w, h }
    }

    /// True when both extents are strictly positive, i.e. usable as a divisor.
    pub fn is_positive(&self) -> bool {
        self.w > U::Scalar::ZERO && self.h > U::Scalar::ZERO
    }
}

impl Dimensions<Screen> {
    /// Number of pixels covered; zero for degenerate or negative extents.
    pub fn area(&self) -> usize {
        if !self.is_positive() {
            return 0;
        }
        self.w as usize * self.h as usize
    }
}

impl<U: Unit> Rect<U> {
    pub const fn new(pos: Point<U>, size: Dimensions<U>) -> Self {
        Self { pos, size }
    }

    /// A rectangle anchored at the origin, e.g. a whole render target.
    pub fn from_size(size: Dimensions<U>) -> Self {
        Self::new(Point::origin(), size)
    }

    /// The maximum (bottom-right) corner.
    pub fn end(&self) -> Point<U> {
        Point::new(self.pos.x + self.size.w, self.pos.y + self.size.h)
    }
}

impl<U: Unit> Add for Point<U> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<U: Unit> AddAssign for Point<U> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<U: Unit> Sub for Point<U> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<U: Unit> SubAssign for Point<U> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<U: Unit> Neg for Point<U> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<U: Unit> fmt::Display for Point<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl<U: Unit> fmt::Display for Dimensions<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

// ---------------------------------------------------------------------------
// Mapping primitives
// ---------------------------------------------------------------------------

impl<U: Unit> PointInRect<U> {
    pub fn new(point: Point<U>, rect: Rect<U>) -> Self {
        Self { point, rect }
    }

    /// Where the point sits inside its rectangle as fractions of the
    /// rectangle's size.
    ///
    /// The result is not clamped: a point left of the rectangle yields a
    /// negative x, one past its right edge yields x > 1. Dragging relies on
    /// this.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle has a zero or negative extent.
    pub fn relative_position(&self) -> Point<Relative> {
        let size = self.rect.size;
        assert!(
            size.is_positive(),
            "relative_position: rectangle has degenerate size {size}"
        );
        Point::new(
            (self.point.x - self.rect.pos.x).to_real() / size.w.to_real(),
            (self.point.y - self.rect.pos.y).to_real() / size.h.to_real(),
        )
    }

    /// Re-expresses the point at the same relative position inside `target`.
    ///
    /// Converts screen pixels to world coordinates and, with a target
    /// anchored at the origin, screen deltas to world deltas.
    pub fn map<V: Unit>(&self, target: Rect<V>) -> Point<V> {
        let rel = self.relative_position();
        Point::new(
            V::Scalar::from_real(target.pos.x.to_real() + rel.x * target.size.w.to_real()),
            V::Scalar::from_real(target.pos.y.to_real() + rel.y * target.size.h.to_real()),
        )
    }

    /// Like [`map`](Self::map) but keeps the target rectangle attached.
    pub fn map_into<V: Unit>(&self, target: Rect<V>) -> PointInRect<V> {
        PointInRect::new(self.map(target), target)
    }

    /// Scales the rectangle by `amount` around the point, keeping the
    /// point's relative position fixed. `amount < 1` zooms in.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not strictly positive or the rectangle is
    /// degenerate.
    pub fn zoom(&self, amount: Real) -> PointInRect<U> {
        assert!(amount > 0.0, "zoom: amount must be positive, got {amount}");

        let rel = self.relative_position();
        let w = amount * self.rect.size.w.to_real();
        let h = amount * self.rect.size.h.to_real();
        let pos = Point::new(
            U::Scalar::from_real(self.point.x.to_real() - rel.x * w),
            U::Scalar::from_real(self.point.y.to_real() - rel.y * h),
        );
        let size = Dimensions::new(U::Scalar::from_real(w), U::Scalar::from_real(h));

        PointInRect::new(self.point, Rect::new(pos, size))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
