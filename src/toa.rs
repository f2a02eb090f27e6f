//! Time-of-arrival records.
//!
//! TOA management (loading tim files, clock chains, grouping) lives in an
//! external collaborator; the model core only needs an opaque per-arrival
//! context to hand to component delay and phase functions.

use crate::time::Mjd;
use serde::{Deserialize, Serialize};

/// A single observed pulse time of arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toa {
    /// Arrival epoch at the observatory.
    pub mjd: Mjd,

    /// Observing frequency in MHz.
    pub freq: f64,

    /// TOA uncertainty in microseconds.
    pub error: f64,

    /// Observatory code.
    pub obs: String,
}

impl Toa {
    /// Create a TOA with the given epoch and observing frequency.
    pub fn new(mjd: Mjd, freq: f64) -> Self {
        Self {
            mjd,
            freq,
            error: 0.0,
            obs: String::new(),
        }
    }

    /// Set the TOA uncertainty in microseconds.
    pub fn with_error(mut self, error: f64) -> Self {
        self.error = error;
        self
    }

    /// Set the observatory code.
    pub fn with_obs(mut self, obs: &str) -> Self {
        self.obs = obs.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toa_builder() {
        let toa = Toa::new(Mjd::new(54321, 0.5), 1440.0)
            .with_error(1.2)
            .with_obs("gbt");
        assert_eq!(toa.mjd.day(), 54321);
        assert_eq!(toa.freq, 1440.0);
        assert_eq!(toa.error, 1.2);
        assert_eq!(toa.obs, "gbt");
    }
}
