//! Vector and color value types.
//!
//! Every physics type in the crate is generic over a [`Vector`], implemented
//! for [`glam::Vec2`] (flat, canvas-style swarms) and [`glam::Vec3`]
//! (swarms with depth). The trait only names what the simulation needs on
//! top of glam's operators.
//!
//! # Example
//!
//! ```
//! use pointswarm::math::Vector;
//! use glam::Vec2;
//!
//! fn speed<V: Vector>(velocity: V) -> f32 {
//!     velocity.length()
//! }
//!
//! assert_eq!(speed(Vec2::new(3.0, 4.0)), 5.0);
//! assert!(Vector::try_normalize(Vec2::ZERO).is_none());
//! ```

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A fixed-size spatial vector the simulation can run on.
///
/// Values are immutable in spirit: every operation returns a new vector.
/// `try_normalize` is the only partial operation and reports a degenerate
/// (zero-length or non-finite) input as `None` instead of producing NaN.
pub trait Vector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    /// Number of spatial axes (2 or 3).
    const DIM: usize;

    /// The zero vector.
    const ZERO: Self;

    /// Standard inner product.
    fn dot(self, rhs: Self) -> f32;

    /// Euclidean norm over all axes.
    fn length(self) -> f32;

    /// Unit vector in the same direction, or `None` for a degenerate input.
    fn try_normalize(self) -> Option<Self>;

    /// Component along `axis` (0 = x, 1 = y, 2 = z).
    fn axis(self, axis: usize) -> f32;

    /// Overwrite the component along `axis`.
    fn set_axis(&mut self, axis: usize, value: f32);

    /// Build a vector component by component.
    fn from_fn(f: impl FnMut(usize) -> f32) -> Self;

    /// Squared length, cheaper than [`Vector::length`] for comparisons.
    fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Take the leading `DIM` components of a 3-array.
    fn from_array3(v: [f32; 3]) -> Self {
        Self::from_fn(|axis| v[axis])
    }

    /// Widen to a 3-array, zero-filling missing axes.
    fn to_array3(self) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (axis, slot) in out.iter_mut().enumerate().take(Self::DIM) {
            *slot = self.axis(axis);
        }
        out
    }
}

impl Vector for Vec2 {
    const DIM: usize = 2;
    const ZERO: Self = Vec2::ZERO;

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec2::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> f32 {
        Vec2::length(self)
    }

    #[inline]
    fn try_normalize(self) -> Option<Self> {
        Vec2::try_normalize(self)
    }

    #[inline]
    fn axis(self, axis: usize) -> f32 {
        self[axis]
    }

    #[inline]
    fn set_axis(&mut self, axis: usize, value: f32) {
        self[axis] = value;
    }

    fn from_fn(mut f: impl FnMut(usize) -> f32) -> Self {
        Vec2::new(f(0), f(1))
    }
}

impl Vector for Vec3 {
    const DIM: usize = 3;
    const ZERO: Self = Vec3::ZERO;

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec3::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> f32 {
        Vec3::length(self)
    }

    #[inline]
    fn try_normalize(self) -> Option<Self> {
        Vec3::try_normalize(self)
    }

    #[inline]
    fn axis(self, axis: usize) -> f32 {
        self[axis]
    }

    #[inline]
    fn set_axis(&mut self, axis: usize, value: f32) {
        self[axis] = value;
    }

    fn from_fn(mut f: impl FnMut(usize) -> f32) -> Self {
        Vec3::new(f(0), f(1), f(2))
    }
}

/// One of the three color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels, in `r, g, b` order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// RGB color with integer channels in the conventional 0-255 range.
///
/// Channels are deliberately not clamped: jitter and `darker` with a negative
/// amount can push them out of range, and clamping happens where the color is
/// handed to a renderer (see [`Color::to_unit`] and [`crate::render`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    /// Create a color from raw channel values.
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Subtract `amount` from every channel, flooring at 0.
    ///
    /// A negative amount lightens the color (with no upper bound).
    pub fn darker(self, amount: i32) -> Self {
        Self {
            r: (self.r - amount).max(0),
            g: (self.g - amount).max(0),
            b: (self.b - amount).max(0),
        }
    }

    /// Add a per-channel offset.
    pub fn offset(self, dr: i32, dg: i32, db: i32) -> Self {
        Self {
            r: self.r + dr,
            g: self.g + dg,
            b: self.b + db,
        }
    }

    /// Read a single channel.
    pub fn channel(self, channel: Channel) -> i32 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// Overwrite a single channel.
    pub fn set_channel(&mut self, channel: Channel, value: i32) {
        match channel {
            Channel::Red => self.r = value,
            Channel::Green => self.g = value,
            Channel::Blue => self.b = value,
        }
    }

    /// Channels scaled to 0.0-1.0, clamped.
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(
            self.r.clamp(0, 255) as f32 / 255.0,
            self.g.clamp(0, 255) as f32 / 255.0,
            self.b.clamp(0, 255) as f32 / 255.0,
        )
    }
}
