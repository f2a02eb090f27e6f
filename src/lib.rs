//! # partim-rs
//!
//! `partim-rs` is a pulsar timing-model parameter framework: it models
//! pulsar rotation and signal propagation to predict pulse arrival phase
//! from time-of-arrival (TOA) data, around an extensible parameter system
//! with parfile round-trip support.
//!
//! The library provides:
//! - A [`Parameter`](parameters::Parameter) type with typed values,
//!   uncertainties, frozen (fit/no-fit) flags, and parfile (de)serialization
//! - A [`TimingModel`](model::TimingModel) aggregate that accumulates delay
//!   and phase contributions from composed physical-effect components
//! - A composition facility ([`compose_model`](compose::compose_model)) that
//!   assembles heterogeneous components into one model
//! - A two-part [`Phase`](phase::Phase) representation that keeps integer
//!   and fractional cycles separate for long-baseline precision
//!
//! Concrete physics (astrometry, binary models, clock corrections), TOA
//! table management, residuals, and fitting algorithms live in external
//! collaborators that implement the [`Component`](compose::Component)
//! contract.
//!
//! ## Basic Usage
//!
//! ```
//! use partim_rs::model::TimingModel;
//! use partim_rs::parameters::{Parameter, ParamKind};
//!
//! let mut model = TimingModel::new("Demo");
//! model
//!     .add_param(Parameter::new("F0", ParamKind::Float, "Spin frequency").with_units("Hz"))
//!     .unwrap();
//!
//! let report = model
//!     .read_parfile_str("PSRJ J1234+1234\nF0 186.494 1 6.2D-12\n")
//!     .unwrap();
//! assert_eq!(report.claimed, 2);
//! assert!(!model.get("F0").unwrap().frozen);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Model core
pub mod compose;
pub mod model;
pub mod phase;
pub mod time;
pub mod toa;

// Re-exports for convenience
pub use error::{Result, TimingModelError};

pub use compose::{compose_model, Component, ComponentFactory, ModelDefinition};
pub use model::{ParfileReport, TimingModel};
pub use parameters::{ParamKind, ParamValue, Parameter};
pub use phase::Phase;
pub use time::Mjd;
pub use toa::Toa;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
