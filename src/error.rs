use thiserror::Error;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Problems found while building variables or a rule base. None of these can
/// happen during evaluation: a rule base that was built successfully is always
/// able to produce an answer.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("variable `{variable}` has an invalid universe [{min}, {max}] (step {step})")]
    InvalidUniverse {
        variable: String,
        min: f64,
        max: f64,
        step: f64,
    },
    #[error("term `{term}` of variable `{variable}` has invalid membership parameters: {reason}")]
    InvalidMembership {
        variable: String,
        term: String,
        reason: String,
    },
    #[error("term `{term}` was declared more than once")]
    DuplicateTerm { term: String },
    #[error("variable `{variable}` declares no terms")]
    NoTerms { variable: String },
    #[error("default value {value} of variable `{variable}` is not a finite number")]
    InvalidDefault { variable: String, value: f64 },
    #[error("variable handle does not belong to this variable table")]
    ForeignVariable,
    #[error("rule {rule} references a variable that is not part of this rule base")]
    UnknownVariable { rule: usize },
    #[error("rule {rule} references term `{term}` which variable `{variable}` does not declare")]
    UnknownTerm {
        rule: usize,
        variable: String,
        term: String,
    },
    #[error("rule {rule} uses output variable `{variable}` in its premise")]
    OutputInPremise { rule: usize, variable: String },
    #[error("rule {rule} must conclude a single term of an output variable, found `{found}`")]
    InvalidConsequence { rule: usize, found: String },
    #[error("unknown input `{name}`")]
    UnknownInput { name: String },
}
