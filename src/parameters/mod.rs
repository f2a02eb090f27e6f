//! # Parameter System
//!
//! This module provides the parameter layer of the timing-model framework.
//! Each physical or model quantity is a named [`Parameter`] carrying a typed
//! value, an optional uncertainty, a frozen (fit/no-fit) flag, and parfile
//! aliases.
//!
//! ## Key Features
//!
//! - **Named Parameters**: Work with descriptive parameter names rather than
//!   array indices
//! - **Closed value-kind catalog**: floats (with legacy `D`-exponent
//!   notation), split-day MJD epochs, strings, and booleans
//! - **Parfile round-trip**: every parameter serializes to and claims back
//!   its own `NAME VALUE [FIT_FLAG] [UNCERTAINTY]` line
//! - **Serialization Support**: Save and load parameter state with serde
//!
//! ## Example Usage
//!
//! ```rust
//! use partim_rs::parameters::{Parameter, ParamKind};
//!
//! let mut f0 = Parameter::new("F0", ParamKind::Float, "Spin frequency")
//!     .with_units("Hz");
//!
//! // Claim a parfile line: value, fit flag, uncertainty.
//! assert!(f0.from_parfile_line("F0 186.494081566982 1 6.2D-12").unwrap());
//! assert!(!f0.frozen);
//!
//! // And serialize the state back out.
//! let line = f0.as_parfile_line();
//! assert!(line.starts_with("F0"));
//! ```

pub mod parameter;
pub mod value;

// Re-export key types
pub use parameter::Parameter;
pub use value::{fortran_float, ParamKind, ParamValue, ValueParseError};
