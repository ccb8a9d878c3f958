use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::inputs::Inputs;
use crate::ops::*;
use crate::outputs::Outputs;
use crate::rules::{CompiledRule, RuleBase};
use crate::variable::{Role, VariableKey};

/// Operator for folding the implied consequents of every rule targeting the
/// same output into one fuzzy set. Each choice is a union: folding in another
/// rule never lowers the aggregate anywhere.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl Aggregation {
    fn link(self) -> ProductionLink {
        match self {
            Self::Max => ProductionLink::Max,
            Self::ProbOr => ProductionLink::ProbOr,
            Self::BoundedSum => ProductionLink::BoundedSum,
        }
    }
}

/// Mamdani style inference. Holds only operator choices, so one instance can
/// evaluate any number of rule bases and calls concurrently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MamdaniInference {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    aggregation: Aggregation,
    defuzz_op: DefuzzificationOp,
}

impl MamdaniInference {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        aggregation: Aggregation,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            aggregation,
            defuzz_op,
        }
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn or_op(&self) -> OrOp {
        self.or_op
    }

    pub fn imp_op(&self) -> ImplicationOp {
        self.imp_op
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    pub fn defuzz_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    /// Evaluates every rule against `inputs` and defuzzifies each output.
    ///
    /// Never fails: inputs are clamped to their universe, missing inputs use
    /// the variable's default and an output no rule reached defuzzifies to
    /// [`NO_EVIDENCE`].
    pub fn eval<T>(&self, rule_base: &RuleBase<T>, inputs: &Inputs) -> Outputs {
        let mut context = InferenceContext::new(rule_base, inputs);

        for rule in &rule_base.rules {
            context.apply(rule, self);
        }

        context.defuzzificate(rule_base, self.defuzz_op)
    }
}

/// Per-call scratch state. Created fresh by every evaluation and consumed by
/// defuzzification.
struct InferenceContext {
    facts: SecondaryMap<VariableKey, f64>,
    aggregated: SecondaryMap<VariableKey, Vec<f64>>,
    firing_strengths: Vec<f64>,
}

impl InferenceContext {
    fn new<T>(rule_base: &RuleBase<T>, inputs: &Inputs) -> Self {
        let mut facts = SecondaryMap::new();
        let mut aggregated = SecondaryMap::new();

        for (key, var) in rule_base.vars.iter() {
            match var.role {
                Role::Input => {
                    let given = inputs.0.get(&rule_base.vars.id(key)).copied().unwrap_or(var.default);
                    let value = var.clamp(given);

                    if value != given {
                        trace!(variable = %var.name, given, value, "clamped input to universe");
                    }

                    facts.insert(key, value);
                },
                // Outputs nobody reaches stay at the zero function
                Role::Output => {
                    aggregated.insert(key, vec![0.; var.universe.len()]);
                },
            }
        }

        Self {
            facts,
            aggregated,
            firing_strengths: Vec::with_capacity(rule_base.rules.len()),
        }
    }

    fn apply(&mut self, rule: &CompiledRule, model: &MamdaniInference) {
        let strength = rule.antecedent.fire(&self.facts, model.and_op, model.or_op);

        self.firing_strengths.push(strength);

        if strength <= 0. {
            return;
        }

        let implied = model.imp_op.call(strength, rule.consequent_samples.iter().copied());
        let link = model.aggregation.link();

        if let Some(aggregate) = self.aggregated.get_mut(rule.output) {
            for (current, implied) in aggregate.iter_mut().zip(implied) {
                *current = link.apply(*current, implied);
            }
        }
    }

    fn defuzzificate<T>(self, rule_base: &RuleBase<T>, defuzz_op: DefuzzificationOp) -> Outputs {
        let mut crisp = SecondaryMap::new();

        for (key, aggregate) in &self.aggregated {
            let var = &rule_base.vars.slots[key];
            let value = defuzz_op.call(&var.universe, aggregate);

            crisp.insert(key, value);
        }

        let outputs = Outputs {
            table: rule_base.vars.table,
            crisp,
            aggregated: self.aggregated,
            inputs: self.facts,
            firing_strengths: self.firing_strengths,
        };

        debug!(
            rules = rule_base.rules.len(),
            fired = outputs.fired(),
            "evaluated fuzzy rule base"
        );

        outputs
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use fixed_map::Key;

    use super::*;
    use crate::error::ConfigError;
    use crate::membership::MembershipFunction::{Trapezoidal, Triangular};
    use crate::rules::Rules;
    use crate::terms::Terms;
    use crate::variable::Variables;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
    enum Score {
        High,
        Low,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
    enum Ratio {
        Good,
        Bad,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
    enum Credit {
        Good,
        Bad,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
    enum Decision {
        Approve,
        Reject,
    }

    macro_rules! display_as_debug {
        ($($term:ty),+) => {
            $(
                impl std::fmt::Display for $term {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        std::fmt::Debug::fmt(self, f)
                    }
                }
            )+
        };
    }

    display_as_debug!(Score, Ratio, Credit, Decision);

    crate::term_union! {
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        enum VarTerms {
            Score(Score),
            Ratio(Ratio),
            Credit(Credit),
            Decision(Decision),
        }
    }

    struct BankLoan {
        rule_base: RuleBase<VarTerms>,
        score: crate::variable::Variable<Score>,
        ratio: crate::variable::Variable<Ratio>,
        credit: crate::variable::Variable<Credit>,
        decision: crate::variable::Variable<Decision>,
    }

    fn bank_loan(extra_decision_rules: bool) -> Result<BankLoan, ConfigError> {
        let score_terms = Terms::new()
            .with(Score::High, Trapezoidal(175., 190., 200., 200.))?
            .with(Score::Low, Trapezoidal(150., 150., 160., 175.))?;
        let ratio_terms = Terms::new()
            .with(Ratio::Good, Trapezoidal(0.1, 0.1, 0.3, 0.42))?
            .with(Ratio::Bad, Trapezoidal(0.44, 0.7, 1., 1.))?;
        let credit_terms = Terms::new()
            .with(Credit::Good, Trapezoidal(0., 0., 2., 5.))?
            .with(Credit::Bad, Trapezoidal(5., 8., 10., 10.))?;
        let decision_terms = Terms::new()
            .with(Decision::Approve, Triangular(5., 10., 10.))?
            .with(Decision::Reject, Triangular(0., 0., 5.))?;

        let mut vars = Variables::<VarTerms>::new();
        let score = vars.add("score", 150. ..=200., score_terms, None)?;
        let ratio = vars.add("ratio", 0.1..=1., ratio_terms, Some(0.01))?;
        let credit = vars.add("credit", 0. ..=10., credit_terms, None)?;
        let decision = vars.add_output("decision", 0. ..=10., decision_terms, Some(0.05))?;
        let mut rules = Rules::new();

        rules.add(
            score
                .is(Score::High)
                .and2(ratio.is(Ratio::Good), credit.is(Credit::Good)),
            decision.is(Decision::Approve),
        );
        rules.add(
            score
                .is(Score::Low)
                .and(ratio.is(Ratio::Bad))
                .or(credit.is(Credit::Bad)),
            decision.is(Decision::Reject),
        );

        if extra_decision_rules {
            rules.add(credit.is(Credit::Good).not().not(), decision.is(Decision::Approve));
        }

        Ok(BankLoan {
            rule_base: RuleBase::new(vars, rules)?,
            score,
            ratio,
            credit,
            decision,
        })
    }

    #[test]
    fn test_bank_loan() {
        let loan = bank_loan(false).unwrap();
        let inputs = Inputs::new()
            .with(loan.score, 190.)
            .with(loan.ratio, 0.39)
            .with(loan.credit, 1.5);

        let outputs = MamdaniInference::default().eval(&loan.rule_base, &inputs);

        // Only the approve rule fires: ratio 0.39 is good to degree 0.25
        assert_eq!(outputs.firing_strengths().len(), 2);
        assert_abs_diff_eq!(outputs.firing_strengths()[0], 0.25, epsilon = 1e-9);
        assert_eq!(outputs.firing_strengths()[1], 0.);

        let decision = outputs.crisp(loan.decision).unwrap();

        assert!(decision > 7. && decision <= 10., "decision was {decision}");
    }

    #[test]
    fn test_inputs_are_clamped_and_defaulted() {
        let loan = bank_loan(false).unwrap();
        let inputs = Inputs::new().with(loan.score, 1_000.).with(loan.ratio, -3.);

        let outputs = MamdaniInference::default().eval(&loan.rule_base, &inputs);

        assert_eq!(outputs.input(loan.score), Some(200.));
        assert_eq!(outputs.input(loan.ratio), Some(0.1));
        // Not provided, so the lower bound default applies
        assert_eq!(outputs.input(loan.credit), Some(0.));
        assert_eq!(outputs.input(loan.decision), None);
    }

    #[test]
    fn test_nothing_fires_falls_back() {
        let loan = bank_loan(false).unwrap();
        // Score in between high and low, credit in the gap between good and bad
        let inputs = Inputs::new()
            .with(loan.score, 175.)
            .with(loan.ratio, 0.43)
            .with(loan.credit, 5.);

        let model = MamdaniInference::default();
        let outputs = model.eval(&loan.rule_base, &inputs);

        assert_eq!(outputs.fired(), 0);
        assert!(outputs.aggregated(loan.decision).unwrap().iter().all(|mu| *mu == 0.));
        assert_eq!(outputs.crisp(loan.decision), Some(NO_EVIDENCE));
        // Same answer every time
        assert_eq!(model.eval(&loan.rule_base, &inputs).crisp(loan.decision), Some(NO_EVIDENCE));
    }

    #[test]
    fn test_not_not_is_identity() {
        let loan = bank_loan(true).unwrap();
        let inputs = Inputs::new().with(loan.credit, 3.5);

        let outputs = MamdaniInference::default().eval(&loan.rule_base, &inputs);

        assert_abs_diff_eq!(outputs.firing_strengths()[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_larsen_and_other_defuzzifiers() {
        let loan = bank_loan(false).unwrap();
        let inputs = Inputs::new()
            .with(loan.score, 190.)
            .with(loan.ratio, 0.2)
            .with(loan.credit, 1.);

        for defuzz_op in [
            DefuzzificationOp::Cog,
            DefuzzificationOp::Boa,
            DefuzzificationOp::Mom,
            DefuzzificationOp::Lom,
            DefuzzificationOp::Som,
        ] {
            let model = MamdaniInference::new(
                AndOp::Prod,
                OrOp::ProbOr,
                ImplicationOp::Scale,
                Aggregation::ProbOr,
                defuzz_op,
            );
            let decision = model.eval(&loan.rule_base, &inputs).crisp(loan.decision).unwrap();

            assert!((5. ..=10.).contains(&decision), "{defuzz_op:?} gave {decision}");
        }

        let lom = MamdaniInference::new(
            AndOp::Min,
            OrOp::Max,
            ImplicationOp::Clip,
            Aggregation::Max,
            DefuzzificationOp::Lom,
        );

        assert_eq!(lom.eval(&loan.rule_base, &inputs).crisp(loan.decision), Some(10.));
    }

    #[test]
    fn test_rule_base_rejects_bad_rules() {
        let mut vars = Variables::<VarTerms>::new();
        let score_terms = Terms::new().with(Score::High, Trapezoidal(175., 190., 200., 200.)).unwrap();
        let decision_terms = Terms::new().with(Decision::Approve, Triangular(5., 10., 10.)).unwrap();
        let score = vars.add("score", 150. ..=200., score_terms, None).unwrap();
        let decision = vars.add_output("decision", 0. ..=10., decision_terms, None).unwrap();

        let mut undeclared = Rules::new();
        undeclared.add(score.is(Score::Low), decision.is(Decision::Approve));

        let mut output_in_premise = Rules::new();
        output_in_premise.add(decision.is(Decision::Approve), decision.is(Decision::Approve));

        let mut compound_consequence = Rules::new();
        compound_consequence.add(
            score.is(Score::High),
            decision.is(Decision::Approve).and(decision.is(Decision::Approve)),
        );

        let mut input_consequence = Rules::new();
        input_consequence.add(score.is(Score::High), score.is(Score::High));

        // Slot 0 of another table lines up with "score" in the checked table
        let mut other_vars = Variables::<VarTerms>::new();
        let terms = Terms::new().with(Score::High, Trapezoidal(175., 190., 200., 200.)).unwrap();
        let foreign = other_vars.add("a", 150. ..=200., terms, None).unwrap();
        let terms = Terms::new().with(Decision::Approve, Triangular(5., 10., 10.)).unwrap();
        let foreign_output = other_vars.add_output("b", 0. ..=10., terms, None).unwrap();

        let mut foreign_premise = Rules::new();
        foreign_premise.add(foreign.is(Score::High), decision.is(Decision::Approve));

        let mut foreign_consequence = Rules::new();
        foreign_consequence.add(score.is(Score::High), decision.is(Decision::Approve));
        foreign_consequence.add(score.is(Score::High), foreign_output.is(Decision::Approve));

        let check = |rules: Rules<VarTerms>| {
            let mut vars = Variables::<VarTerms>::new();
            let score_terms = Terms::new().with(Score::High, Trapezoidal(175., 190., 200., 200.)).unwrap();
            let decision_terms = Terms::new().with(Decision::Approve, Triangular(5., 10., 10.)).unwrap();
            vars.add("score", 150. ..=200., score_terms, None).unwrap();
            vars.add_output("decision", 0. ..=10., decision_terms, None).unwrap();

            RuleBase::new(vars, rules).err()
        };

        assert!(matches!(check(undeclared), Some(ConfigError::UnknownTerm { rule: 0, .. })));
        assert!(matches!(check(output_in_premise), Some(ConfigError::OutputInPremise { .. })));
        assert!(matches!(check(compound_consequence), Some(ConfigError::InvalidConsequence { .. })));
        assert!(matches!(check(input_consequence), Some(ConfigError::InvalidConsequence { .. })));
        assert!(matches!(check(foreign_premise), Some(ConfigError::UnknownVariable { rule: 0 })));
        assert!(matches!(check(foreign_consequence), Some(ConfigError::UnknownVariable { rule: 1 })));
    }

    #[test]
    fn test_outputs_reject_foreign_handles() {
        let loan = bank_loan(false).unwrap();
        let other = bank_loan(false).unwrap();
        let inputs = Inputs::new().with(loan.score, 190.);

        let outputs = MamdaniInference::default().eval(&loan.rule_base, &inputs);

        assert!(outputs.crisp(loan.decision).is_some());
        assert_eq!(outputs.crisp(other.decision), None);
        assert_eq!(outputs.aggregated(other.decision), None);
        assert_eq!(outputs.input(other.score), None);

        // An input handle from another table is not an input to this one
        let foreign_inputs = Inputs::new().with(other.score, 150.);
        let outputs = MamdaniInference::default().eval(&loan.rule_base, &foreign_inputs);

        assert_eq!(outputs.input(loan.score), Some(150.));
    }

    #[test]
    fn test_untargeted_output_defuzzifies_to_no_evidence() {
        let mut vars = Variables::<VarTerms>::new();
        let score_terms = Terms::new().with(Score::High, Trapezoidal(175., 190., 200., 200.)).unwrap();
        let decision_terms = Terms::new().with(Decision::Approve, Triangular(5., 10., 10.)).unwrap();
        let idle_terms = Terms::new().with(Decision::Reject, Triangular(0., 0., 5.)).unwrap();
        let score = vars.add("score", 150. ..=200., score_terms, None).unwrap();
        let decision = vars.add_output("decision", 0. ..=10., decision_terms, None).unwrap();
        let idle = vars.add_output("idle", 0. ..=10., idle_terms, None).unwrap();
        let mut rules = Rules::new();

        rules.add(score.is(Score::High), decision.is(Decision::Approve));

        let rule_base = RuleBase::new(vars, rules).unwrap();
        let outputs = MamdaniInference::default().eval(&rule_base, &Inputs::new().with(score, 200.));

        assert_eq!(outputs.fired(), 1);
        assert!(outputs.crisp(decision).unwrap() > 5.);
        assert_eq!(outputs.crisp(idle), Some(NO_EVIDENCE));

        let aggregate = outputs.aggregated(idle).unwrap();

        assert!(!aggregate.is_empty());
        assert!(aggregate.iter().all(|mu| *mu == 0.));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let model: MamdaniInference = serde_json::from_str(r#"{ "defuzz_op": "Mom" }"#).unwrap();

        assert_eq!(model.defuzz_op(), DefuzzificationOp::Mom);
        assert_eq!(model.and_op(), AndOp::Min);
        assert_eq!(model.aggregation(), Aggregation::Max);
    }
}
