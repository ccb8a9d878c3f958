//! A small Mamdani fuzzy inference engine and, built on it, a commute mode
//! recommender.
//!
//! Variables are declared with typed term enums, rules are written with a
//! tiny DSL over the returned handles and compiled into an immutable
//! [`RuleBase`]. Evaluating it never fails and never mutates it:
//!
//! ```
//! use fuzzy_commute::{CommuteInputs, CommuteModel, Mode};
//!
//! let model = CommuteModel::new().unwrap();
//! let recommendation = model.recommend(&CommuteInputs::new(1.0, 0.0, 0.2));
//!
//! assert_eq!(recommendation.label, Mode::Walk);
//! ```

mod commute;
mod dsl;
mod error;
mod explain;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub use commute::heuristic::expected_mode;
pub use commute::model::{CommuteInputs, CommuteModel, Recommendation};
pub use commute::rule_table::{rule_table, CommuteVariables};
pub use commute::terms::{CommuteTerm, Crowd, Distance, Flexibility, Punctuality, Rain, Suitability, TimeOfDay};
pub use commute::{Mode, ModeScores};
pub use dsl::Expr;
pub use error::{ConfigError, Result};
pub use explain::{Clause, Explanation};
pub use inference::{Aggregation, MamdaniInference};
pub use inputs::Inputs;
pub use membership::MembershipFunction;
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink, NO_EVIDENCE};
pub use outputs::Outputs;
pub use rules::{Rule, RuleBase, Rules};
pub use terms::{Key, Term, Terms};
pub use variable::{LinguisticVariable, Role, VarId, Variable, VariableKey, Variables};
