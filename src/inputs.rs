use std::collections::HashMap;

use crate::variable::{VarId, Variable};

/// Crisp values for one evaluation. Inputs left out take the variable's
/// default value; out of range values are clamped when evaluated.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<VarId, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add<I>(&mut self, var: Variable<I>, val: f64) {
        self.0.insert(var.0, val);
    }

    /// Builder flavour of [`Inputs::add`]
    pub fn with<I>(mut self, var: Variable<I>, val: f64) -> Self {
        self.add(var, val);
        self
    }

    pub fn get<I>(&self, var: Variable<I>) -> Option<f64> {
        self.0.get(&var.0).copied()
    }
}
