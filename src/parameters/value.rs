//! Parameter value kinds and their parse/print behavior.
//!
//! Every parameter selects one kind from a closed catalog at construction
//! time. Keeping the catalog closed (rather than accepting arbitrary parse
//! callables) keeps the value space enumerable and testable.

use crate::time::Mjd;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error raised when a raw parfile token cannot be parsed as a value kind.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot parse '{input}' as {kind}")]
pub struct ValueParseError {
    /// The raw token that failed to parse.
    pub input: String,
    /// Display name of the expected kind.
    pub kind: &'static str,
}

/// Parse a numeric string in the permissive legacy convention.
///
/// Tempo-era parfiles carry Fortran scientific notation, where the exponent
/// marker may be `D` or `d` in addition to `E`/`e` (e.g. `1.23D-4`).
///
/// # Examples
///
/// ```
/// use partim_rs::parameters::fortran_float;
///
/// assert_eq!(fortran_float("1.23D-4").unwrap(), 1.23e-4);
/// assert_eq!(fortran_float("4.5d2").unwrap(), 450.0);
/// assert_eq!(fortran_float("100.0").unwrap(), 100.0);
/// ```
pub fn fortran_float(s: &str) -> Result<f64, ValueParseError> {
    s.trim()
        .replace('D', "e")
        .replace('d', "e")
        .parse()
        .map_err(|_| ValueParseError {
            input: s.to_string(),
            kind: "float",
        })
}

/// The closed catalog of supported parameter value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// A plain real number, parsed with [`fortran_float`].
    Float,
    /// A Modified Julian Date, parsed into a split-day [`Mjd`].
    Mjd,
    /// A free-form string (e.g. the pulsar source name).
    Str,
    /// A boolean flag (`1`/`0`, `Y`/`N`, `TRUE`/`FALSE`).
    Bool,
}

impl ParamKind {
    /// Display name of the kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Mjd => "MJD",
            ParamKind::Str => "string",
            ParamKind::Bool => "boolean",
        }
    }

    /// Parse a raw token into a value of this kind.
    pub fn parse(&self, raw: &str) -> Result<ParamValue, ValueParseError> {
        match self {
            ParamKind::Float => fortran_float(raw).map(ParamValue::Float),
            ParamKind::Mjd => raw
                .parse::<Mjd>()
                .map(ParamValue::Mjd)
                .map_err(|_| ValueParseError {
                    input: raw.to_string(),
                    kind: self.name(),
                }),
            ParamKind::Str => Ok(ParamValue::Str(raw.to_string())),
            ParamKind::Bool => match raw.to_uppercase().as_str() {
                "1" | "Y" | "YES" | "T" | "TRUE" => Ok(ParamValue::Bool(true)),
                "0" | "N" | "NO" | "F" | "FALSE" => Ok(ParamValue::Bool(false)),
                _ => Err(ValueParseError {
                    input: raw.to_string(),
                    kind: self.name(),
                }),
            },
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f64),
    Mjd(Mjd),
    Str(String),
    Bool(bool),
}

impl ParamValue {
    /// The value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as an MJD, if it is one.
    pub fn as_mjd(&self) -> Option<&Mjd> {
        match self {
            ParamValue::Mjd(m) => Some(m),
            _ => None,
        }
    }

    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    /// Print the value in its parfile form. Floats use Rust's shortest
    /// round-trip formatting, so printed values re-parse exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Mjd(m) => write!(f, "{}", m),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}
