use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SlotMap};

use crate::error::{ConfigError, Result};
use crate::linspace::Linspace;
use crate::math::merge_points;
use crate::membership::MembershipFunction;
use crate::terms::{Term, Terms};

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

static NEXT_TABLE: AtomicU64 = AtomicU64::new(0);

/// Identifies one [`Variables`] table, so handles from another table are
/// never mistaken for a variable that happens to share their slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct TableId(u64);

impl TableId {
    pub(crate) fn next() -> Self {
        TableId(NEXT_TABLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Untyped reference to a variable: the table it was declared in and its slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VarId {
    pub(crate) table: TableId,
    pub(crate) key: VariableKey,
}

/// Typed handle to a variable whose terms are the enum `I`.
pub struct Variable<I>(pub(crate) VarId, PhantomData<I>);

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> Debug for Variable<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

/// Whether a variable is fed by the caller or inferred by the rules
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Input,
    Output,
}

/// The table of linguistic variables a rule base is written against. `T` is
/// the crate user's union of every variable's term enum.
pub struct Variables<T> {
    pub(crate) table: TableId,
    pub(crate) slots: SlotMap<VariableKey, LinguisticVariable<T>>,
}

impl<T> Default for Variables<T> {
    fn default() -> Self {
        Self {
            table: TableId::next(),
            slots: SlotMap::with_key(),
        }
    }
}

impl<T> Variables<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` for a handle declared in another table
    pub fn get<I>(&self, var: Variable<I>) -> Option<&LinguisticVariable<T>> {
        self.lookup(var.0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn lookup(&self, id: VarId) -> Option<&LinguisticVariable<T>> {
        if id.table != self.table {
            return None;
        }

        self.slots.get(id.key)
    }

    pub(crate) fn id(&self, key: VariableKey) -> VarId {
        VarId { table: self.table, key }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable<T>)> {
        self.slots.iter()
    }
}

impl<T: Copy + PartialEq> Variables<T> {
    /// Declares an input variable. If the step value is not provided, it
    /// defaults to 0.1. The default crisp value starts at the lower bound of
    /// the universe.
    pub fn add<I>(
        &mut self,
        name: &str,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>>
    where
        I: Into<T> + Term + Copy + Debug,
    {
        self.insert(Role::Input, name, universe_range, terms, step)
    }

    /// Declares an output variable, the target of rule consequences.
    pub fn add_output<I>(
        &mut self,
        name: &str,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>>
    where
        I: Into<T> + Term + Copy + Debug,
    {
        self.insert(Role::Output, name, universe_range, terms, step)
    }

    /// Sets the value an input takes when a caller does not provide one.
    pub fn set_default<I>(&mut self, var: Variable<I>, value: f64) -> Result<()> {
        if var.0.table != self.table {
            return Err(ConfigError::ForeignVariable);
        }

        let variable = self.slots.get_mut(var.0.key).ok_or(ConfigError::ForeignVariable)?;

        if !value.is_finite() {
            return Err(ConfigError::InvalidDefault {
                variable: variable.name.clone(),
                value,
            });
        }

        variable.default = variable.clamp(value);

        Ok(())
    }

    fn insert<I>(
        &mut self,
        role: Role,
        name: &str,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>>
    where
        I: Into<T> + Term + Copy + Debug,
    {
        let term_coords = terms.iter().map(|(k, v)| (k, *v)).collect::<Vec<_>>();
        let variable = LinguisticVariable::new(name, role, universe_range, term_coords, step.unwrap_or(0.1))?;
        let key = self.slots.insert(variable);

        Ok(Variable(self.id(key), PhantomData))
    }
}

/// A named universe of discourse and the fuzzy sets covering it.
#[derive(Debug)]
pub struct LinguisticVariable<T> {
    pub(crate) name: String,
    pub(crate) role: Role,
    pub(crate) universe: Vec<f64>,
    pub(crate) min_u: f64,
    pub(crate) max_u: f64,
    pub(crate) default: f64,
    /// In the term enum's declaration order
    pub(crate) terms: Vec<(T, MembershipFunction)>,
}

impl<T> LinguisticVariable<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_u, self.max_u)
    }

    /// Sorted sample points of the universe
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// Restricts `value` to the universe. NaN is treated as the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min_u;
        }

        value.clamp(self.min_u, self.max_u)
    }
}

impl<T: Copy + PartialEq> LinguisticVariable<T> {
    fn new<I>(
        name: &str,
        role: Role,
        universe_range: RangeInclusive<f64>,
        term_coords: Vec<(I, MembershipFunction)>,
        step: f64,
    ) -> Result<Self>
    where
        I: Into<T> + Copy + Debug,
    {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !(min_u.is_finite() && max_u.is_finite() && min_u < max_u && step.is_finite() && step > 0.) {
            return Err(ConfigError::InvalidUniverse {
                variable: name.to_owned(),
                min: min_u,
                max: max_u,
                step,
            });
        }
        if term_coords.is_empty() {
            return Err(ConfigError::NoTerms {
                variable: name.to_owned(),
            });
        }

        let num = Linspace::sample_count(min_u, max_u, step);
        let mut universe: Vec<f64> = Linspace::new(min_u, max_u, num).collect();
        let mut terms = Vec::with_capacity(term_coords.len());

        for (term, membership) in term_coords {
            membership.validate().map_err(|reason| ConfigError::InvalidMembership {
                variable: name.to_owned(),
                term: format!("{term:?}"),
                reason,
            })?;

            // Sample the breakpoints exactly so peaks are not shaved off
            merge_points(&mut universe, membership.breakpoints(), min_u, max_u);
            terms.push((term.into(), membership));
        }

        Ok(Self {
            name: name.to_owned(),
            role,
            universe,
            min_u,
            max_u,
            default: min_u,
            terms,
        })
    }

    pub fn terms(&self) -> impl Iterator<Item = (T, &MembershipFunction)> + '_ {
        self.terms.iter().map(|(t, m)| (*t, m))
    }

    pub(crate) fn membership(&self, term: T) -> Option<&MembershipFunction> {
        self.terms.iter().find(|(t, _)| *t == term).map(|(_, m)| m)
    }

    /// Degree of `value` in every term, in declaration order
    pub fn fuzzify(&self, value: f64) -> Vec<(T, f64)> {
        let value = self.clamp(value);

        self.terms.iter().map(|(t, m)| (*t, m.evaluate(value))).collect()
    }

    /// The term `value` belongs to the most. Ties go to the term declared
    /// first.
    pub fn dominant_term(&self, value: f64) -> (T, f64) {
        let mut best = (self.terms[0].0, f64::NEG_INFINITY);

        for (term, degree) in self.fuzzify(value) {
            if degree > best.1 {
                best = (term, degree);
            }
        }

        best
    }
}
