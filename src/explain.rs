use std::fmt::{self, Display};

use serde::Serialize;

use crate::outputs::Outputs;
use crate::rules::RuleBase;
use crate::variable::{Role, Variable};

impl<T: Copy + PartialEq> RuleBase<T> {
    /// The term of `var` that `value` belongs to the most, with its degree.
    /// Ties go to the term declared first.
    pub fn dominant_term<I>(&self, var: Variable<I>, value: f64) -> Option<(T, f64)> {
        self.vars.get(var).map(|v| v.dominant_term(value))
    }

    /// Dominant term of every input variable at the values an evaluation
    /// used, in variable declaration order.
    pub fn dominant_terms<'a>(&'a self, outputs: &Outputs) -> Vec<(&'a str, T, f64)> {
        self.vars
            .iter()
            .filter(|(_, var)| var.role == Role::Input)
            .filter_map(|(key, var)| {
                let value = outputs.inputs.get(key)?;
                let (term, degree) = var.dominant_term(*value);

                Some((var.name(), term, degree))
            })
            .collect()
    }
}

/// One "subject label" fragment of an explanation, e.g. "rain heavy"
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub subject: String,
    pub label: String,
}

/// A verdict followed by the linguistic reading of each input:
/// `"Bus (suitability=6.2/10) — distance near, rain moderate."`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Explanation {
    verdict: String,
    clauses: Vec<Clause>,
}

impl Explanation {
    pub fn new(verdict: impl Into<String>) -> Self {
        Self {
            verdict: verdict.into(),
            clauses: Vec::new(),
        }
    }

    pub fn clause(mut self, subject: impl Into<String>, label: impl Display) -> Self {
        self.clauses.push(Clause {
            subject: subject.into(),
            label: label.to_string(),
        });
        self
    }

    pub fn verdict(&self) -> &str {
        &self.verdict
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verdict)?;

        for (i, clause) in self.clauses.iter().enumerate() {
            let sep = if i == 0 { " — " } else { ", " };

            write!(f, "{sep}{} {}", clause.subject, clause.label)?;
        }

        f.write_str(".")
    }
}

#[test]
fn test_explanation_format() {
    let explanation = Explanation::new("Bus (suitability=6.2/10)")
        .clause("distance", "near")
        .clause("rain", "moderate")
        .clause("crowd", "low");

    assert_eq!(
        explanation.to_string(),
        "Bus (suitability=6.2/10) — distance near, rain moderate, crowd low."
    );
    assert_eq!(explanation.clauses().len(), 3);
    assert_eq!(Explanation::new("Walk").to_string(), "Walk.");
}
