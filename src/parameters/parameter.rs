//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, the fundamental building block
//! of the timing-model parameter system. Parameters carry a typed value, an
//! optional uncertainty, a frozen (fit/no-fit) flag, and the parse/print
//! logic that defines their parfile serialization.

use crate::error::{Result, TimingModelError};
use crate::parameters::value::{fortran_float, ParamKind, ParamValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timing-model parameter.
///
/// A parameter owns its name, value kind, current value, units, description,
/// uncertainty, frozen state, and the set of parfile aliases under which it
/// can be addressed. Values start unset and are populated either directly or
/// by claiming a parfile line.
///
/// # Examples
///
/// ```
/// use partim_rs::parameters::{Parameter, ParamKind};
///
/// let mut param = Parameter::new("F0", ParamKind::Float, "Spin frequency")
///     .with_units("Hz");
/// assert!(param.value().is_none());
/// assert!(param.frozen);
///
/// param.set("1.23D2").unwrap();
/// assert_eq!(param.value().unwrap().as_float().unwrap(), 123.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Canonical name of the parameter. Immutable after construction.
    name: String,

    /// Value kind, selecting parse/print behavior from the closed catalog.
    kind: ParamKind,

    /// Current value; `None` until set. Unset parameters are omitted from
    /// parfile output.
    value: Option<ParamValue>,

    /// Display-only units label.
    pub units: Option<String>,

    /// Short description of what this parameter means.
    pub description: String,

    /// Uncertainty of the value; always a plain number regardless of kind.
    pub uncertainty: Option<f64>,

    /// Whether fitters should leave this parameter fixed. Defaults to true.
    pub frozen: bool,

    /// Whether phase derivatives with respect to this parameter exist.
    pub continuous: bool,

    /// Alternate names accepted in parfile lookup. Never contains the
    /// canonical name.
    aliases: Vec<String>,
}

impl Parameter {
    /// Create a new parameter with the given name, value kind, and
    /// description.
    ///
    /// The parameter starts unset, frozen, and continuous, with no units,
    /// no uncertainty, and no aliases.
    pub fn new(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value: None,
            units: None,
            description: description.to_string(),
            uncertainty: None,
            frozen: true,
            continuous: true,
            aliases: Vec::new(),
        }
    }

    /// Create a time-valued parameter preconfigured for MJD epochs.
    ///
    /// Units are fixed to "MJD" and parse/print are bound to the split-day
    /// MJD string format; all other behavior is inherited unchanged. New
    /// physical quantity kinds are added the same way: by supplying a
    /// (kind, units) pairing, not by modifying Parameter itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use partim_rs::parameters::Parameter;
    ///
    /// let mut pepoch = Parameter::mjd("PEPOCH", "Reference epoch for spin-down");
    /// pepoch.set("54321.0000776696").unwrap();
    /// assert_eq!(pepoch.units.as_deref(), Some("MJD"));
    /// ```
    pub fn mjd(name: &str, description: &str) -> Self {
        Self::new(name, ParamKind::Mjd, description).with_units("MJD")
    }

    /// Set the units label.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Add parfile aliases.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Mark the parameter as having no phase derivatives.
    pub fn discrete(mut self) -> Self {
        self.continuous = false;
        self
    }

    /// Get the name of the parameter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value kind of the parameter.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Get the current value, or `None` if unset.
    pub fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    /// Set the value directly from an already-typed value.
    pub fn set_value(&mut self, value: ParamValue) {
        self.value = Some(value);
    }

    /// Parse a raw string via the parameter's value kind and store the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`TimingModelError::ParseError`] if the configured parser
    /// rejects the input; the previous value is left unchanged.
    pub fn set(&mut self, raw: &str) -> Result<()> {
        let parsed = self.kind.parse(raw).map_err(|e| TimingModelError::ParseError {
            param: self.name.clone(),
            input: e.input,
            kind: e.kind.to_string(),
        })?;
        self.value = Some(parsed);
        Ok(())
    }

    /// Get the parfile aliases of the parameter.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Add a name to the list of aliases for this parameter.
    ///
    /// No uniqueness check happens here; alias/name disjointness across a
    /// model is enforced at registration time by
    /// [`TimingModel::add_param`](crate::model::TimingModel::add_param).
    pub fn add_alias(&mut self, alias: &str) {
        self.aliases.push(alias.to_string());
    }

    /// Return a help line containing the parameter name, description, and
    /// units.
    pub fn help_line(&self) -> String {
        let mut out = format!("{:<12} {}", self.name, self.description);
        if let Some(units) = &self.units {
            out.push_str(&format!(" ({})", units));
        }
        out
    }

    /// Return a parfile line giving the current state of the parameter.
    ///
    /// Unset parameters produce an empty string and are thereby omitted
    /// from parfile output entirely. If the uncertainty is set, the fit
    /// flag (0 frozen, 1 not) and uncertainty are always emitted; if the
    /// uncertainty is unset but the parameter is not frozen, a bare fit
    /// flag `1` is emitted; a frozen parameter without uncertainty gets no
    /// trailing fields.
    pub fn as_parfile_line(&self) -> String {
        let value = match &self.value {
            Some(v) => v,
            None => return String::new(),
        };
        let mut line = format!("{:<15} {:>25}", self.name, value.to_string());
        if let Some(unc) = self.uncertainty {
            line.push_str(&format!(" {} {}", if self.frozen { 0 } else { 1 }, unc));
        } else if !self.frozen {
            line.push_str(" 1");
        }
        line.push('\n');
        line
    }

    /// Parse a parfile line into the current state of the parameter.
    ///
    /// Returns `Ok(true)` if the line was claimed, `Ok(false)` if not.
    /// The first whitespace token, upper-cased, must match the parameter's
    /// name or an alias; otherwise the line is not claimed and no state
    /// changes. A matching line with no value token is rejected as
    /// malformed (`Ok(false)`), not treated as an error.
    ///
    /// The third token, when present, is a fit flag: a value greater than
    /// zero clears `frozen`. A non-positive flag leaves the frozen state
    /// untouched, so this path can only unfreeze, never freeze. The fourth
    /// token, when present, is parsed as the uncertainty with the generic
    /// numeric parser regardless of the parameter's own kind.
    ///
    /// # Errors
    ///
    /// Parse failures on the value, fit flag, or uncertainty tokens of a
    /// claimed line propagate as [`TimingModelError::ParseError`].
    pub fn from_parfile_line(&mut self, line: &str) -> Result<bool> {
        let k: Vec<&str> = line.split_whitespace().collect();
        let first = match k.first() {
            Some(tok) => tok.to_uppercase(),
            None => return Ok(false),
        };
        if first != self.name && !self.aliases.iter().any(|a| *a == first) {
            return Ok(false);
        }
        if k.len() < 2 {
            return Ok(false);
        }
        self.set(k[1])?;
        if k.len() >= 3 {
            let flag: i64 = k[2].parse().map_err(|_| TimingModelError::ParseError {
                param: self.name.clone(),
                input: k[2].to_string(),
                kind: "fit flag".to_string(),
            })?;
            if flag > 0 {
                self.frozen = false;
            }
        }
        if k.len() >= 4 {
            let unc = fortran_float(k[3]).map_err(|e| TimingModelError::ParseError {
                param: self.name.clone(),
                input: e.input,
                kind: "uncertainty".to_string(),
            })?;
            self.uncertainty = Some(unc);
        }
        Ok(true)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(units) = &self.units {
            write!(f, " ({})", units)?;
        }
        match &self.value {
            Some(v) => write!(f, " {}", v)?,
            None => write!(f, " UNSET")?,
        }
        if let Some(unc) = self.uncertainty {
            write!(f, " +/- {}", unc)?;
        }
        Ok(())
    }
}
