//! The TimingModel aggregate and parfile I/O.
//!
//! A `TimingModel` owns an ordered registry of [`Parameter`]s and the delay
//! and phase component functions contributed by composed physical-effect
//! components. Delay and phase predictions are pure accumulations over those
//! functions; parfile reading offers each line to every registered parameter
//! until one claims it.

use crate::compose::Component;
use crate::error::{Result, TimingModelError};
use crate::parameters::{ParamKind, Parameter};
use crate::phase::Phase;
use crate::toa::Toa;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A delay contribution: seconds to subtract from a TOA, as a function of
/// the model's current parameter state.
///
/// Component functions read parameter state through the shared model
/// reference; they never mutate it.
pub type DelayFn = Box<dyn Fn(&TimingModel, &Toa) -> Result<f64>>;

/// A phase contribution, given the TOA and the total precomputed delay in
/// seconds.
pub type PhaseFn = Box<dyn Fn(&TimingModel, &Toa, f64) -> Result<Phase>>;

/// Summary of a parfile read: which lines were claimed and which were not.
///
/// Unclaimed lines are a warning, not an error; legacy and foreign parfile
/// content loads partially rather than failing hard.
#[derive(Debug, Clone, Default)]
pub struct ParfileReport {
    /// Number of lines claimed by a registered parameter.
    pub claimed: usize,
    /// Lines no registered parameter claimed, verbatim.
    pub unclaimed: Vec<String>,
}

impl ParfileReport {
    /// Number of lines no parameter claimed.
    pub fn unclaimed_count(&self) -> usize {
        self.unclaimed.len()
    }
}

/// A pulsar timing model: parameters plus composed delay/phase components.
///
/// Every model starts with a single built-in parameter, the pulsar source
/// name `PSR` (parfile aliases `PSRJ`, `PSRB`). Physical-effect components
/// contribute further parameters and their delay/phase functions through
/// composition (see [`compose_model`](crate::compose::compose_model)).
pub struct TimingModel {
    /// Model name, used in help output and diagnostics.
    name: String,

    /// Parameter names in registration order; drives parfile output order.
    order: Vec<String>,

    /// Canonical-name lookup for parameters.
    params: HashMap<String, Parameter>,

    /// Delay component functions, in registration order.
    delay_funcs: Vec<DelayFn>,

    /// Phase component functions, in registration order.
    phase_funcs: Vec<PhaseFn>,

    /// Delay-derivative providers per continuous parameter.
    delay_derivs: HashMap<String, Vec<DelayFn>>,

    /// Phase-derivative providers per continuous parameter.
    phase_derivs: HashMap<String, Vec<PhaseFn>>,

    /// Composed components, in composition order; their setup hooks run
    /// after a parfile load.
    components: Vec<Box<dyn Component>>,
}

impl TimingModel {
    /// Create an empty model containing only the built-in source-name
    /// parameter.
    pub fn new(name: &str) -> Self {
        let mut model = Self {
            name: name.to_string(),
            order: Vec::new(),
            params: HashMap::new(),
            delay_funcs: Vec::new(),
            phase_funcs: Vec::new(),
            delay_derivs: HashMap::new(),
            phase_derivs: HashMap::new(),
            components: Vec::new(),
        };
        // Fresh model, cannot collide.
        model.insert_param(
            Parameter::new("PSR", ParamKind::Str, "Source name")
                .with_aliases(&["PSRJ", "PSRB"])
                .discrete(),
        );
        model
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a parameter on the model.
    ///
    /// The parameter becomes addressable by name lookup and joins the
    /// ordered sequence that drives parfile output. Derivative-provider
    /// slots are created only for continuous parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TimingModelError::DuplicateParameter`] if the parameter's
    /// name or any of its aliases collides with an already-registered
    /// parameter's name or aliases. Name and alias sets must stay disjoint
    /// across the whole model so a parfile line can be claimed by at most
    /// one parameter. A failed call leaves the model unchanged.
    pub fn add_param(&mut self, param: Parameter) -> Result<()> {
        let mut incoming = vec![param.name().to_string()];
        incoming.extend(param.aliases().iter().cloned());

        for existing in self.params.values() {
            for candidate in &incoming {
                if existing.name() == candidate
                    || existing.aliases().iter().any(|a| a == candidate)
                {
                    return Err(TimingModelError::DuplicateParameter {
                        param: param.name().to_string(),
                        msg: Some(format!(
                            "'{}' collides with registered parameter '{}'",
                            candidate,
                            existing.name()
                        )),
                    });
                }
            }
        }

        self.insert_param(param);
        Ok(())
    }

    fn insert_param(&mut self, param: Parameter) {
        let name = param.name().to_string();
        self.order.push(name.clone());
        if param.continuous {
            self.delay_derivs.insert(name.clone(), Vec::new());
            self.phase_derivs.insert(name.clone(), Vec::new());
        }
        self.params.insert(name, param);
    }

    /// Get a parameter by canonical name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// Get a mutable reference to a parameter by canonical name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.get_mut(name)
    }

    /// Whether a parameter with the given canonical name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in registration order.
    pub fn param_names(&self) -> &[String] {
        &self.order
    }

    /// Iterate over parameters in registration order.
    pub fn params(&self) -> impl Iterator<Item = &Parameter> {
        self.order.iter().filter_map(|n| self.params.get(n))
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the model has no registered parameters.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Help lines for all registered parameters, in registration order.
    pub fn param_help(&self) -> String {
        let mut out = format!("Available parameters for {}\n", self.name);
        for param in self.params() {
            out.push_str(&param.help_line());
            out.push('\n');
        }
        out
    }

    /// Register a delay component function.
    pub fn add_delay_func(&mut self, f: DelayFn) {
        self.delay_funcs.push(f);
    }

    /// Register a phase component function.
    pub fn add_phase_func(&mut self, f: PhaseFn) {
        self.phase_funcs.push(f);
    }

    /// Register a delay-derivative provider for a continuous parameter.
    ///
    /// # Errors
    ///
    /// Fails if the parameter is unregistered or was registered as
    /// non-continuous (no derivative slot exists).
    pub fn add_delay_deriv(&mut self, param: &str, f: DelayFn) -> Result<()> {
        match self.delay_derivs.get_mut(param) {
            Some(providers) => {
                providers.push(f);
                Ok(())
            }
            None => Err(TimingModelError::Other(format!(
                "parameter '{}' has no delay-derivative slot (unregistered or not continuous)",
                param
            ))),
        }
    }

    /// Register a phase-derivative provider for a continuous parameter.
    ///
    /// # Errors
    ///
    /// Fails if the parameter is unregistered or was registered as
    /// non-continuous (no derivative slot exists).
    pub fn add_phase_deriv(&mut self, param: &str, f: PhaseFn) -> Result<()> {
        match self.phase_derivs.get_mut(param) {
            Some(providers) => {
                providers.push(f);
                Ok(())
            }
            None => Err(TimingModelError::Other(format!(
                "parameter '{}' has no phase-derivative slot (unregistered or not continuous)",
                param
            ))),
        }
    }

    /// Compose a component into the model.
    ///
    /// The component registers its parameters and delay/phase/derivative
    /// functions immediately; its setup hook runs after each parfile load.
    pub fn add_component(&mut self, component: Box<dyn Component>) -> Result<()> {
        component.register(self)?;
        self.components.push(component);
        Ok(())
    }

    /// Total delay in seconds to subtract from the given TOA to get the
    /// time of emission at the pulsar.
    ///
    /// The sum over zero registered delay functions is 0.0. Functions are
    /// invoked in registration order, but contributions are additive and
    /// the result does not depend on that order.
    pub fn delay(&self, toa: &Toa) -> Result<f64> {
        let mut delay = 0.0;
        for df in &self.delay_funcs {
            delay += df(self, toa)?;
        }
        Ok(delay)
    }

    /// Model-predicted pulse phase for the given TOA.
    ///
    /// Computes the total delay once, then accumulates each phase
    /// component's contribution in the two-part [`Phase`] representation.
    pub fn phase(&self, toa: &Toa) -> Result<Phase> {
        let delay = self.delay(toa)?;
        let mut phase = Phase::zero();
        for pf in &self.phase_funcs {
            phase += pf(self, toa, delay)?;
        }
        Ok(phase)
    }

    /// Derivative of the total delay with respect to a parameter.
    ///
    /// Sums the registered providers for the parameter; a parameter with no
    /// providers (or no derivative slot at all) contributes no delay, so the
    /// result is 0.0, not an error.
    pub fn d_delay_d_param(&self, toa: &Toa, param: &str) -> Result<f64> {
        let mut result = 0.0;
        if let Some(providers) = self.delay_derivs.get(param) {
            for f in providers {
                result += f(self, toa)?;
            }
        }
        Ok(result)
    }

    /// Derivative of the phase with respect to a parameter.
    ///
    /// The base model only sums the phase-derivative providers registered
    /// for the parameter; with none registered the result is the zero
    /// phase. Chain-rule composition through the delay dependency is NOT
    /// implemented here — a component whose parameters affect phase through
    /// the delay must register providers that account for that themselves.
    pub fn d_phase_d_param(&self, toa: &Toa, param: &str) -> Result<Phase> {
        let mut result = Phase::zero();
        if let Some(providers) = self.phase_derivs.get(param) {
            if providers.is_empty() {
                return Ok(result);
            }
            let delay = self.delay(toa)?;
            for f in providers {
                result += f(self, toa, delay)?;
            }
        }
        Ok(result)
    }

    /// Parfile representation of the entire model as a string.
    ///
    /// Parameters appear in registration order; unset parameters are
    /// omitted.
    pub fn as_parfile(&self) -> String {
        let mut result = String::new();
        for param in self.params() {
            result.push_str(&param.as_parfile_line());
        }
        result
    }

    /// Read values from the given parfile into the model parameters.
    ///
    /// The whole file is read before any line is parsed, so the file handle
    /// is released even when a parse error aborts the load midway. See
    /// [`read_parfile_str`](Self::read_parfile_str) for the line-handling
    /// rules.
    pub fn read_parfile<P: AsRef<Path>>(&mut self, path: P) -> Result<ParfileReport> {
        let contents = std::fs::read_to_string(path)?;
        self.read_parfile_str(&contents)
    }

    /// Read values from parfile-formatted text into the model parameters.
    ///
    /// Blank lines and lines starting with `#` are skipped. Every other
    /// line is offered, in registration order, to each registered
    /// parameter; a line no parameter claims is warned about and recorded
    /// in the returned report, but does not abort the read. After all lines
    /// are consumed the composed components' setup hooks run exactly once
    /// to validate required parameters.
    ///
    /// # Errors
    ///
    /// Parse failures on a claimed line, and setup-hook failures such as
    /// [`TimingModelError::MissingParameter`], propagate.
    pub fn read_parfile_str(&mut self, contents: &str) -> Result<ParfileReport> {
        let mut report = ParfileReport::default();
        for line in contents.lines() {
            let line = line.trim();
            // Skip blank and commented lines.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parsed = false;
            for name in &self.order {
                if let Some(param) = self.params.get_mut(name) {
                    if param.from_parfile_line(line)? {
                        debug!(param = name.as_str(), "claimed parfile line");
                        parsed = true;
                        break;
                    }
                }
            }
            if parsed {
                report.claimed += 1;
            } else {
                warn!("Unrecognized parfile line '{}'", line);
                report.unclaimed.push(line.to_string());
            }
        }

        // Required-parameter checks and other cross-parameter validation
        // can only run once the entire parfile has been read.
        self.setup()?;
        Ok(report)
    }

    /// Run the composed components' post-load validation hooks.
    ///
    /// A model with no components validates trivially.
    pub fn setup(&self) -> Result<()> {
        for component in &self.components {
            component.setup(self)?;
        }
        Ok(())
    }
}

impl fmt::Display for TimingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in self.params() {
            writeln!(f, "{}", param)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TimingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingModel")
            .field("name", &self.name)
            .field("params", &self.order)
            .field("delay_funcs", &self.delay_funcs.len())
            .field("phase_funcs", &self.phase_funcs.len())
            .field("components", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Mjd;
    use approx::assert_relative_eq;

    fn test_toa() -> Toa {
        Toa::new(Mjd::new(54321, 0.25), 1440.0)
    }

    fn float_param(name: &str) -> Parameter {
        Parameter::new(name, ParamKind::Float, "test parameter")
    }

    #[test]
    fn test_new_model_has_psr() {
        let model = TimingModel::new("TestModel");
        assert_eq!(model.len(), 1);
        let psr = model.get("PSR").unwrap();
        assert_eq!(psr.aliases(), ["PSRJ", "PSRB"]);
        assert!(psr.value().is_none());
    }

    #[test]
    fn test_add_param_and_lookup() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        assert!(model.contains("F0"));
        assert_eq!(model.param_names(), ["PSR", "F0"]);

        // Continuous parameters get derivative slots.
        assert!(model
            .add_delay_deriv("F0", Box::new(|_, _| Ok(0.0)))
            .is_ok());

        // Discrete parameters do not.
        model.add_param(float_param("FLAG").discrete()).unwrap();
        assert!(model
            .add_delay_deriv("FLAG", Box::new(|_, _| Ok(0.0)))
            .is_err());
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();

        let err = model.add_param(float_param("F0")).unwrap_err();
        match err {
            TimingModelError::DuplicateParameter { param, .. } => assert_eq!(param, "F0"),
            _ => panic!("Expected DuplicateParameter variant"),
        }
        // The failed call left the model unchanged.
        assert_eq!(model.param_names(), ["PSR", "F0"]);
    }

    #[test]
    fn test_alias_collision_rejected() {
        let mut model = TimingModel::new("TestModel");

        // New name colliding with an existing alias.
        let err = model.add_param(float_param("PSRJ")).unwrap_err();
        assert!(matches!(err, TimingModelError::DuplicateParameter { .. }));

        // New alias colliding with an existing name.
        let param = float_param("F0").with_aliases(&["PSR"]);
        let err = model.add_param(param).unwrap_err();
        assert!(matches!(err, TimingModelError::DuplicateParameter { .. }));

        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_delay_zero_components() {
        let model = TimingModel::new("TestModel");
        assert_eq!(model.delay(&test_toa()).unwrap(), 0.0);
    }

    #[test]
    fn test_delay_sums_components() {
        let mut model = TimingModel::new("TestModel");
        model.add_delay_func(Box::new(|_, _| Ok(1.5)));
        model.add_delay_func(Box::new(|_, _| Ok(-0.25)));
        model.add_delay_func(Box::new(|_, toa| Ok(toa.freq / 1440.0)));

        let toa = test_toa();
        assert_relative_eq!(model.delay(&toa).unwrap(), 1.5 - 0.25 + 1.0);
    }

    #[test]
    fn test_delay_order_independent() {
        let toa = test_toa();
        let contributions: [f64; 3] = [0.125, -2.5, 31.0625];

        let mut forward = TimingModel::new("Forward");
        for c in contributions {
            forward.add_delay_func(Box::new(move |_, _| Ok(c)));
        }
        let mut reverse = TimingModel::new("Reverse");
        for c in contributions.iter().rev() {
            let c = *c;
            reverse.add_delay_func(Box::new(move |_, _| Ok(c)));
        }

        assert_eq!(
            forward.delay(&toa).unwrap(),
            reverse.delay(&toa).unwrap()
        );
    }

    #[test]
    fn test_phase_accumulates_two_part() {
        let mut model = TimingModel::new("TestModel");
        model.add_delay_func(Box::new(|_, _| Ok(10.0)));
        // Each phase function sees the same precomputed total delay.
        model.add_phase_func(Box::new(|_, _, delay| {
            assert_eq!(delay, 10.0);
            Ok(Phase::new(100, 0.75))
        }));
        model.add_phase_func(Box::new(|_, _, _| Ok(Phase::new(0, 0.75))));

        let phase = model.phase(&test_toa()).unwrap();
        assert_eq!(phase.int(), 101);
        assert_relative_eq!(phase.frac(), 0.5);
    }

    #[test]
    fn test_phase_reads_parameter_state() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        model.get_mut("F0").unwrap().set("2.0").unwrap();

        model.add_phase_func(Box::new(|m, toa, delay| {
            let f0 = m
                .get("F0")
                .and_then(|p| p.value())
                .and_then(|v| v.as_float())
                .ok_or_else(|| TimingModelError::EvaluationError("F0 unset".to_string()))?;
            let t = toa.mjd.frac() * 86400.0 - delay;
            Ok(Phase::from(f0 * t))
        }));

        let phase = model.phase(&test_toa()).unwrap();
        // 2.0 Hz for a quarter day = 43200 cycles.
        assert_eq!(phase.int(), 43200);
    }

    #[test]
    fn test_d_delay_d_param() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();

        // No providers registered: additive identity, not an error.
        assert_eq!(model.d_delay_d_param(&test_toa(), "F0").unwrap(), 0.0);
        // Same for a name with no slot at all.
        assert_eq!(model.d_delay_d_param(&test_toa(), "NOPE").unwrap(), 0.0);

        model
            .add_delay_deriv("F0", Box::new(|_, _| Ok(0.5)))
            .unwrap();
        model
            .add_delay_deriv("F0", Box::new(|_, _| Ok(0.25)))
            .unwrap();
        assert_relative_eq!(model.d_delay_d_param(&test_toa(), "F0").unwrap(), 0.75);
    }

    #[test]
    fn test_d_phase_d_param_base_is_zero() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        let result = model.d_phase_d_param(&test_toa(), "F0").unwrap();
        assert_eq!(result, Phase::zero());
    }

    #[test]
    fn test_d_phase_d_param_sums_providers() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        model
            .add_phase_deriv("F0", Box::new(|_, _, _| Ok(Phase::new(1, 0.25))))
            .unwrap();
        model
            .add_phase_deriv("F0", Box::new(|_, _, _| Ok(Phase::new(0, 0.5))))
            .unwrap();
        let result = model.d_phase_d_param(&test_toa(), "F0").unwrap();
        assert_eq!(result.int(), 1);
        assert_relative_eq!(result.frac(), 0.75);
    }

    #[test]
    fn test_as_parfile_order_and_omission() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        model.add_param(float_param("F1")).unwrap();

        model.get_mut("PSR").unwrap().set("J1234+1234").unwrap();
        model.get_mut("F1").unwrap().set("-1.5e-15").unwrap();
        // F0 stays unset and must not appear at all.

        let parfile = model.as_parfile();
        let lines: Vec<&str> = parfile.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("PSR"));
        assert!(lines[1].starts_with("F1"));
    }

    #[test]
    fn test_read_parfile_str() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();

        let report = model
            .read_parfile_str(
                "# a comment\n\
                 \n\
                 PSRJ J1234+1234\n\
                 F0 186.494 1 6.2D-12\n\
                 BOGUS 42\n",
            )
            .unwrap();

        assert_eq!(report.claimed, 2);
        assert_eq!(report.unclaimed_count(), 1);
        assert_eq!(report.unclaimed[0], "BOGUS 42");

        assert_eq!(
            model.get("PSR").unwrap().value().unwrap().as_str().unwrap(),
            "J1234+1234"
        );
        let f0 = model.get("F0").unwrap();
        assert_relative_eq!(f0.value().unwrap().as_float().unwrap(), 186.494);
        assert!(!f0.frozen);
        assert_relative_eq!(f0.uncertainty.unwrap(), 6.2e-12);
    }

    #[test]
    fn test_read_parfile_str_parse_error_propagates() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        let err = model.read_parfile_str("F0 not-a-number\n").unwrap_err();
        assert!(matches!(err, TimingModelError::ParseError { .. }));
    }

    #[test]
    fn test_parfile_idempotence() {
        let mut model = TimingModel::new("TestModel");
        model.add_param(float_param("F0")).unwrap();
        model.add_param(Parameter::mjd("PEPOCH", "Reference epoch")).unwrap();

        model
            .read_parfile_str(
                "PSR J1234+1234\n\
                 F0 186.49408156698235 1 6.2e-12\n\
                 PEPOCH 54321.0000776696\n",
            )
            .unwrap();

        let first = model.as_parfile();
        model.read_parfile_str(&first).unwrap();
        assert_eq!(model.as_parfile(), first);
    }

    #[test]
    fn test_param_help() {
        let mut model = TimingModel::new("TestModel");
        model
            .add_param(
                Parameter::new("F0", ParamKind::Float, "Spin frequency").with_units("Hz"),
            )
            .unwrap();
        let help = model.param_help();
        assert!(help.starts_with("Available parameters for TestModel"));
        assert!(help.contains("PSR"));
        assert!(help.contains("Spin frequency (Hz)"));
    }
}
