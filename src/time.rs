//! Split-day MJD time values.
//!
//! Pulsar timing quotes epochs as Modified Julian Dates with up to fifteen
//! fractional digits, which is more than one f64 can hold alongside a five
//! digit day number. `Mjd` parses the day and the day fraction separately so
//! the fractional digits of a long MJD string are preserved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when an MJD string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid MJD string '{0}'")]
pub struct MjdParseError(pub String);

/// A Modified Julian Date as an integer day plus a fractional day.
///
/// Invariant: `0.0 <= frac < 1.0`. Construction normalizes, carrying whole
/// days into `day`.
///
/// # Examples
///
/// ```
/// use partim_rs::time::Mjd;
///
/// let epoch: Mjd = "54321.0000776696".parse().unwrap();
/// assert_eq!(epoch.day(), 54321);
/// assert!((epoch.frac() - 0.0000776696).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Mjd {
    day: i64,
    frac: f64,
}

impl Mjd {
    /// Create an MJD from an integer day and a day fraction.
    pub fn new(day: i64, frac: f64) -> Self {
        let carry = frac.floor();
        Self {
            day: day + carry as i64,
            frac: frac - carry,
        }
    }

    /// The integer day number.
    pub fn day(&self) -> i64 {
        self.day
    }

    /// The fractional day, in `[0, 1)`.
    pub fn frac(&self) -> f64 {
        self.frac
    }

    /// Collapse to a single f64 day count. Lossy past ~microsecond level
    /// for contemporary MJDs.
    pub fn as_f64(&self) -> f64 {
        self.day as f64 + self.frac
    }

    /// Difference `self - other` in seconds.
    pub fn seconds_since(&self, other: &Mjd) -> f64 {
        ((self.day - other.day) as f64 + (self.frac - other.frac)) * 86400.0
    }
}

impl FromStr for Mjd {
    type Err = MjdParseError;

    /// Parse an MJD string, splitting at the decimal point so the fractional
    /// digits are parsed independently of the exactly-representable day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (day_part, frac_part) = match s.split_once('.') {
            Some((d, f)) => (d, f),
            None => (s, ""),
        };
        let day: i64 = day_part
            .parse()
            .map_err(|_| MjdParseError(s.to_string()))?;
        if day < 0 {
            return Err(MjdParseError(s.to_string()));
        }
        let frac = if frac_part.is_empty() {
            0.0
        } else {
            format!("0.{}", frac_part)
                .parse::<f64>()
                .map_err(|_| MjdParseError(s.to_string()))?
        };
        if !(0.0..1.0).contains(&frac) {
            return Err(MjdParseError(s.to_string()));
        }
        Ok(Mjd { day, frac })
    }
}

impl fmt::Display for Mjd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 15 fractional digits exhausts the precision an f64 day fraction
        // carries; trailing zeros are trimmed down to one digit.
        let frac_str = format!("{:.15}", self.frac);
        if frac_str.starts_with('1') {
            // Fraction rounded up to a full day at this precision.
            return write!(f, "{}.0", self.day + 1);
        }
        let digits = frac_str[2..].trim_end_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        write!(f, "{}.{}", self.day, digits)
    }
}
