use std::fmt::Debug;

use tracing::info;

use crate::dsl::Expr;
use crate::error::{ConfigError, Result};
use crate::membership::MembershipFunction;
use crate::ops::{AndOp, OrOp};
use crate::variable::{LinguisticVariable, Role, VariableKey, Variables};

/// An ordered list of rules as authored. Nothing is checked until the list
/// is compiled into a [`RuleBase`].
#[derive(Debug)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Rules(Vec::new())
    }
}

impl<T> Rules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// `consequence` must be a single `var.is(term)` over an output variable
    pub fn add(&mut self, premise: Expr<T>, consequence: Expr<T>) {
        self.0.push(Rule { premise, consequence });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<T>> {
        self.0.iter()
    }
}

impl<T> Extend<(Expr<T>, Expr<T>)> for Rules<T> {
    fn extend<It: IntoIterator<Item = (Expr<T>, Expr<T>)>>(&mut self, iter: It) {
        for (premise, consequence) in iter {
            self.add(premise, consequence);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Rule<T> {
    pub premise: Expr<T>,
    pub consequence: Expr<T>,
}

/// A premise with every leaf resolved to its membership function.
#[derive(Clone, Debug)]
pub(crate) enum Antecedent {
    Is(VariableKey, MembershipFunction),
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
    Not(Box<Antecedent>),
}

impl Antecedent {
    /// Firing strength against clamped crisp inputs. Every input variable of
    /// the rule base has an entry in `facts`.
    pub(crate) fn fire(&self, facts: &slotmap::SecondaryMap<VariableKey, f64>, and_op: AndOp, or_op: OrOp) -> f64 {
        match self {
            Antecedent::Is(var_key, membership) => membership.evaluate(facts[*var_key]),
            Antecedent::And(lhs, rhs) => {
                let left = lhs.fire(facts, and_op, or_op);
                let right = rhs.fire(facts, and_op, or_op);

                and_op.apply(left, right)
            },
            Antecedent::Or(lhs, rhs) => {
                let left = lhs.fire(facts, and_op, or_op);
                let right = rhs.fire(facts, and_op, or_op);

                or_op.apply(left, right)
            },
            Antecedent::Not(expr) => 1. - expr.fire(facts, and_op, or_op),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) antecedent: Antecedent,
    pub(crate) output: VariableKey,
    /// Consequent sampled over the output universe
    pub(crate) consequent_samples: Vec<f64>,
}

/// Variables plus a validated, flattened rule list. Immutable once built and
/// safe to share between threads.
pub struct RuleBase<T> {
    pub(crate) vars: Variables<T>,
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) source: Rules<T>,
}

impl<T: Copy + PartialEq + Debug> RuleBase<T> {
    /// Checks every rule against `vars` and compiles it. Fails on the first
    /// rule that references a foreign variable, an undeclared term, uses an
    /// output in its premise or does not conclude a single output term.
    pub fn new(vars: Variables<T>, rules: Rules<T>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let antecedent = compile_premise(&vars, &rule.premise, i)?;

            let Expr::Is(output, term) = &rule.consequence else {
                return Err(ConfigError::InvalidConsequence {
                    rule: i,
                    found: format!("{:?}", rule.consequence),
                });
            };
            let var = vars.lookup(*output).ok_or(ConfigError::UnknownVariable { rule: i })?;

            if var.role != Role::Output {
                return Err(ConfigError::InvalidConsequence {
                    rule: i,
                    found: format!("input variable `{}`", var.name),
                });
            }

            let consequent = lookup_term(var, *term, i)?;
            let consequent_samples = var.universe.iter().map(|y| consequent.evaluate(*y)).collect();

            compiled.push(CompiledRule {
                antecedent,
                output: output.key,
                consequent_samples,
            });
        }

        info!(
            variables = vars.len(),
            rules = compiled.len(),
            "compiled fuzzy rule base"
        );

        Ok(Self {
            vars,
            rules: compiled,
            source: rules,
        })
    }
}

impl<T> RuleBase<T> {
    pub fn variables(&self) -> &Variables<T> {
        &self.vars
    }

    /// The rules as authored, in evaluation order
    pub fn rules(&self) -> &Rules<T> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_premise<T: Copy + PartialEq + Debug>(
    vars: &Variables<T>,
    expr: &Expr<T>,
    rule: usize,
) -> Result<Antecedent> {
    let compiled = match expr {
        Expr::Is(id, term) => {
            let var = vars.lookup(*id).ok_or(ConfigError::UnknownVariable { rule })?;

            if var.role != Role::Input {
                return Err(ConfigError::OutputInPremise {
                    rule,
                    variable: var.name.clone(),
                });
            }

            Antecedent::Is(id.key, *lookup_term(var, *term, rule)?)
        },
        Expr::And(lhs, rhs) => Antecedent::And(
            Box::new(compile_premise(vars, lhs, rule)?),
            Box::new(compile_premise(vars, rhs, rule)?),
        ),
        Expr::Or(lhs, rhs) => Antecedent::Or(
            Box::new(compile_premise(vars, lhs, rule)?),
            Box::new(compile_premise(vars, rhs, rule)?),
        ),
        Expr::Not(expr) => Antecedent::Not(Box::new(compile_premise(vars, expr, rule)?)),
    };

    Ok(compiled)
}

fn lookup_term<T: Copy + PartialEq + Debug>(
    var: &LinguisticVariable<T>,
    term: T,
    rule: usize,
) -> Result<&MembershipFunction> {
    var.membership(term).ok_or_else(|| ConfigError::UnknownTerm {
        rule,
        variable: var.name.clone(),
        term: format!("{term:?}"),
    })
}
