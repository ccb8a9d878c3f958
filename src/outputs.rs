use slotmap::SecondaryMap;

use crate::variable::{TableId, VarId, Variable, VariableKey};

/// Everything one evaluation produced. Owned by the caller; the rule base
/// keeps nothing from the call.
#[derive(Clone, Debug)]
pub struct Outputs {
    pub(crate) table: TableId,
    pub(crate) crisp: SecondaryMap<VariableKey, f64>,
    pub(crate) aggregated: SecondaryMap<VariableKey, Vec<f64>>,
    pub(crate) inputs: SecondaryMap<VariableKey, f64>,
    pub(crate) firing_strengths: Vec<f64>,
}

impl Outputs {
    /// Defuzzified value of an output variable
    pub fn crisp<I>(&self, var: Variable<I>) -> Option<f64> {
        self.key(var.0).and_then(|key| self.crisp.get(key)).copied()
    }

    /// Aggregated membership of an output variable, sampled over its universe
    pub fn aggregated<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.key(var.0).and_then(|key| self.aggregated.get(key)).map(Vec::as_slice)
    }

    /// Input value the rules were evaluated against, after defaults and
    /// clamping
    pub fn input<I>(&self, var: Variable<I>) -> Option<f64> {
        self.key(var.0).and_then(|key| self.inputs.get(key)).copied()
    }

    /// Firing strength of every rule, in rule order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// Number of rules that fired with a non-zero strength
    pub fn fired(&self) -> usize {
        self.firing_strengths.iter().filter(|a| **a > 0.).count()
    }

    fn key(&self, id: VarId) -> Option<VariableKey> {
        (id.table == self.table).then_some(id.key)
    }
}
