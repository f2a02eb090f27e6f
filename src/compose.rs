//! Model composition: assembling heterogeneous effect components into one
//! timing model.
//!
//! The engine knows nothing about astrometry, spin-down, or binary orbits.
//! Each physical effect implements [`Component`], contributing its own
//! parameters and delay/phase functions, and [`compose_model`] combines a
//! list of them under one name. The returned [`ModelDefinition`] is a
//! recipe, not an instance; call
//! [`instantiate`](ModelDefinition::instantiate) to obtain a working model:
//!
//! ```no_run
//! use partim_rs::compose::{compose_model, factory, Component};
//! use partim_rs::model::TimingModel;
//! use partim_rs::Result;
//!
//! #[derive(Default)]
//! struct Spindown;
//!
//! impl Component for Spindown {
//!     fn name(&self) -> &str {
//!         "Spindown"
//!     }
//!
//!     fn register(&self, model: &mut TimingModel) -> Result<()> {
//!         // add parameters and delay/phase functions here
//!         Ok(())
//!     }
//! }
//!
//! let definition = compose_model("MyModel", vec![factory::<Spindown>()]);
//! let mut model = definition.instantiate().unwrap();
//! model.read_parfile("J1234+1234.par").unwrap();
//! ```

use crate::error::Result;
use crate::model::TimingModel;

/// A physical-effect component composable into a [`TimingModel`].
///
/// A component contributes parameters, delay/phase component functions, and
/// derivative providers at registration time, and validates its required
/// parameters after a parfile load. Components hold no mutable model state
/// of their own; everything they compute at evaluation time is read from
/// the model's registered parameters.
pub trait Component {
    /// Component name, used as the owning-module identity in
    /// [`MissingParameter`](crate::error::TimingModelError::MissingParameter)
    /// errors.
    fn name(&self) -> &str;

    /// Register this component's parameters and delay/phase/derivative
    /// functions on the model.
    ///
    /// Called exactly once, when the component is composed into the model.
    fn register(&self, model: &mut TimingModel) -> Result<()>;

    /// Validate cross-parameter invariants after a full parfile load.
    ///
    /// The base implementation accepts anything; components with required
    /// parameters override this and raise
    /// [`MissingParameter`](crate::error::TimingModelError::MissingParameter)
    /// when one was not supplied.
    fn setup(&self, model: &TimingModel) -> Result<()> {
        let _ = model;
        Ok(())
    }
}

/// A factory producing a fresh component instance per model instantiation.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Component>>;

/// Build a [`ComponentFactory`] for any `Default`-constructible component.
pub fn factory<C: Component + Default + 'static>() -> ComponentFactory {
    Box::new(|| Box::new(C::default()))
}

/// A named recipe for building a timing model from components.
///
/// Holds the component factories without instantiating anything, so one
/// definition can stamp out any number of independent model instances.
pub struct ModelDefinition {
    name: String,
    factories: Vec<ComponentFactory>,
}

impl ModelDefinition {
    /// The composite model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of components in the recipe.
    pub fn component_count(&self) -> usize {
        self.factories.len()
    }

    /// Build a fresh [`TimingModel`] from this definition.
    ///
    /// Components are constructed and registered in composition order,
    /// which fixes the parameter registration order and therefore the
    /// parfile output order.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`DuplicateParameter`](crate::error::TimingModelError::DuplicateParameter)
    /// if two components register parameters with colliding names or
    /// aliases.
    pub fn instantiate(&self) -> Result<TimingModel> {
        let mut model = TimingModel::new(&self.name);
        for make in &self.factories {
            model.add_component(make())?;
        }
        Ok(model)
    }
}

/// Combine the listed component factories into a named model definition.
///
/// Nothing is instantiated here; the definition is a recipe that must be
/// instantiated to obtain a working model.
pub fn compose_model(name: &str, factories: Vec<ComponentFactory>) -> ModelDefinition {
    ModelDefinition {
        name: name.to_string(),
        factories,
    }
}
