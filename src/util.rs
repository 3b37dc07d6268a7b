//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: std::cmp::PartialOrd> Interval<T> {
    /// Returns true if this interval overlaps with the other.
    /// Intervals which merely touch at an end point do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max > other.min && other.max > self.min
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Float> Interval<T> {
    /// Creates an interval starting at `start` with the given length.
    pub fn span(start: T, length: T) -> Self {
        Self {
            min: start,
            max: start + length,
        }
    }

    /// Shrinks the interval by `amount` at both ends.
    pub fn inset(&self, amount: T) -> Self {
        Self {
            min: self.min + amount,
            max: self.max - amount,
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

/// An axis-aligned rectangle in field coordinates.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// The horizontal extents.
    pub x: Interval<f64>,
    /// The vertical extents.
    pub y: Interval<f64>,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and its size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Interval::span(x, width),
            y: Interval::span(y, height),
        }
    }

    /// Shrinks the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x.inset(amount),
            y: self.y.inset(amount),
        }
    }

    /// Returns true if the two rectangles strictly overlap on both axes.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = Interval::new(0.0, 10.0);
        assert!(!a.overlaps(&Interval::new(10.0, 20.0)));
        assert!(a.overlaps(&Interval::new(9.5, 20.0)));
        assert!(!a.overlaps(&Interval::new(-5.0, 0.0)));
    }

    #[test]
    fn inset_rect() {
        let rect = Rect::new(80.0, 235.0, 40.0, 30.0).inset(5.0);
        assert_approx_eq!(rect.x.min, 85.0);
        assert_approx_eq!(rect.x.length(), 30.0);
        assert_approx_eq!(rect.y.min, 240.0);
        assert_approx_eq!(rect.y.length(), 20.0);
    }
}
