//! Two-part pulse phase representation.
//!
//! Accumulated pulsar rotational phase over a long timing baseline can reach
//! 1e12 cycles and more, far beyond the point where an f64 can still resolve
//! a fraction of a turn. `Phase` therefore keeps the integer cycle count and
//! the fractional cycle separately, so repeated accumulation of component
//! contributions never loses the fractional part.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A pulse phase as an integer cycle count plus a fractional cycle.
///
/// Invariant: `0.0 <= frac < 1.0`. All constructors and arithmetic
/// operations re-normalize, carrying whole cycles into `int`.
///
/// # Examples
///
/// ```
/// use partim_rs::phase::Phase;
///
/// let a = Phase::new(3, 0.75);
/// let b = Phase::new(1, 0.5);
/// let sum = a + b;
/// assert_eq!(sum.int(), 5);
/// assert_eq!(sum.frac(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    int: i64,
    frac: f64,
}

impl Phase {
    /// Create a phase from an integer cycle count and a fractional part.
    ///
    /// The fractional part may be any finite value; whole cycles are carried
    /// into the integer part so the invariant `0.0 <= frac < 1.0` holds.
    pub fn new(int: i64, frac: f64) -> Self {
        let carry = frac.floor();
        Self {
            int: int + carry as i64,
            frac: frac - carry,
        }
    }

    /// The zero phase (additive identity).
    pub fn zero() -> Self {
        Self { int: 0, frac: 0.0 }
    }

    /// The integer cycle count.
    pub fn int(&self) -> i64 {
        self.int
    }

    /// The fractional cycle, in `[0, 1)`.
    pub fn frac(&self) -> f64 {
        self.frac
    }

    /// Collapse to a single f64 cycle count.
    ///
    /// Lossy for large cycle counts; intended for residual-scale quantities
    /// where the integer part has already been differenced away.
    pub fn value(&self) -> f64 {
        self.int as f64 + self.frac
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for Phase {
    fn from(cycles: f64) -> Self {
        Phase::new(0, cycles)
    }
}

impl Add for Phase {
    type Output = Phase;

    fn add(self, other: Phase) -> Phase {
        Phase::new(self.int + other.int, self.frac + other.frac)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, other: Phase) {
        *self = *self + other;
    }
}

impl Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Phase {
        Phase::new(-self.int, -self.frac)
    }
}

impl Sub for Phase {
    type Output = Phase;

    fn sub(self, other: Phase) -> Phase {
        self + (-other)
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, other: Phase) {
        *self = *self - other;
    }
}
