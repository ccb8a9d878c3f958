use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commute::rule_table::{rule_table, CommuteVariables};
use crate::commute::terms::CommuteTerm;
use crate::commute::{Mode, ModeScores};
use crate::error::{ConfigError, Result};
use crate::explain::Explanation;
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::ops::NO_EVIDENCE;
use crate::outputs::Outputs;
use crate::rules::RuleBase;
use crate::variable::{Variable, Variables};

/// Crisp measurements for one recommendation.
///
/// `Default` gives the reset values: a 1.2 km trip on a dry, off-peak day
/// with half full, mostly punctual buses and a fairly flexible commuter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuteInputs {
    /// Trip length, 0 to 20 km
    pub distance_km: f64,
    /// Rain intensity, 0 to 100 mm/h
    pub rain_mmph: f64,
    /// Bus occupancy ratio, 0 to 1.5
    pub bus_crowd: f64,
    /// 0 is off-peak, 1 is peak rush hour
    pub rush_index: f64,
    /// 0 is on time, 1 is badly delayed
    pub bus_punctuality: f64,
    /// How much slack the commuter has, 0 to 1
    pub flexibility: f64,
}

impl Default for CommuteInputs {
    fn default() -> Self {
        Self {
            distance_km: 1.2,
            rain_mmph: 0.,
            bus_crowd: 0.5,
            rush_index: 0.2,
            bus_punctuality: 0.2,
            flexibility: 0.7,
        }
    }
}

impl CommuteInputs {
    /// Names accepted by [`CommuteInputs::set`] and [`CommuteInputs::get`]
    pub const NAMES: [&'static str; 6] = ["distance", "rain", "crowd", "rush", "punctuality", "flexibility"];

    /// Distance, rain and crowding, with everything else at its default
    pub fn new(distance_km: f64, rain_mmph: f64, bus_crowd: f64) -> Self {
        Self {
            distance_km,
            rain_mmph,
            bus_crowd,
            ..Self::default()
        }
    }

    /// Sets an input by name. Both the short names in [`Self::NAMES`] and the
    /// field names are accepted.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let slot = match Field::parse(name)? {
            Field::Distance => &mut self.distance_km,
            Field::Rain => &mut self.rain_mmph,
            Field::Crowd => &mut self.bus_crowd,
            Field::Rush => &mut self.rush_index,
            Field::Punctuality => &mut self.bus_punctuality,
            Field::Flexibility => &mut self.flexibility,
        };

        *slot = value;

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<f64> {
        Ok(match Field::parse(name)? {
            Field::Distance => self.distance_km,
            Field::Rain => self.rain_mmph,
            Field::Crowd => self.bus_crowd,
            Field::Rush => self.rush_index,
            Field::Punctuality => self.bus_punctuality,
            Field::Flexibility => self.flexibility,
        })
    }
}

#[derive(Clone, Copy)]
enum Field {
    Distance,
    Rain,
    Crowd,
    Rush,
    Punctuality,
    Flexibility,
}

impl Field {
    fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            "distance" | "distance_km" => Field::Distance,
            "rain" | "rain_mmph" => Field::Rain,
            "crowd" | "bus_crowd" => Field::Crowd,
            "rush" | "rush_index" | "time" => Field::Rush,
            "punctuality" | "bus_punctuality" | "buses" => Field::Punctuality,
            "flexibility" => Field::Flexibility,
            _ => {
                return Err(ConfigError::UnknownInput {
                    name: name.to_owned(),
                })
            },
        })
    }
}

/// The outcome of one evaluation, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: Mode,
    /// Suitability of `label`, 0 to 10
    pub score: f64,
    /// Walk, bus and drive suitability rescaled to [0, 1]
    pub memberships: (f64, f64, f64),
    pub scores: ModeScores,
    /// The inputs the rules actually saw, after clamping
    pub inputs: CommuteInputs,
    pub explanation: String,
}

static GLOBAL: Lazy<Result<CommuteModel>> = Lazy::new(CommuteModel::new);

/// The commute rule base together with the operators it is evaluated with.
///
/// Immutable after construction; share it freely between threads.
pub struct CommuteModel {
    rule_base: RuleBase<CommuteTerm>,
    vars: CommuteVariables,
    inference: MamdaniInference,
}

impl CommuteModel {
    /// Builds the model with Min/Max/Clip/Max/Centroid inference
    pub fn new() -> Result<Self> {
        Self::with_inference(MamdaniInference::default())
    }

    pub fn with_inference(inference: MamdaniInference) -> Result<Self> {
        let (variables, vars) = CommuteVariables::declare()?;
        let rule_base = RuleBase::new(variables, rule_table(&vars))?;

        Ok(Self {
            rule_base,
            vars,
            inference,
        })
    }

    /// Process wide instance, built on first use
    pub fn global() -> Result<&'static CommuteModel> {
        Lazy::force(&GLOBAL).as_ref().map_err(Clone::clone)
    }

    pub fn rule_base(&self) -> &RuleBase<CommuteTerm> {
        &self.rule_base
    }

    pub fn variables(&self) -> &CommuteVariables {
        &self.vars
    }

    pub fn inference(&self) -> MamdaniInference {
        self.inference
    }

    /// Runs the rule base and returns the raw engine outputs
    pub fn evaluate(&self, inputs: &CommuteInputs) -> Outputs {
        let v = &self.vars;
        let crisp = Inputs::new()
            .with(v.distance, inputs.distance_km)
            .with(v.rain, inputs.rain_mmph)
            .with(v.crowd, inputs.bus_crowd)
            .with(v.time, inputs.rush_index)
            .with(v.punctuality, inputs.bus_punctuality)
            .with(v.flexibility, inputs.flexibility);

        self.inference.eval(&self.rule_base, &crisp)
    }

    /// Restricts every input to its universe. NaN becomes the lower bound.
    pub fn clamp_inputs(&self, inputs: &CommuteInputs) -> CommuteInputs {
        let vars = self.rule_base.variables();
        let v = &self.vars;

        CommuteInputs {
            distance_km: clamp_to(vars, v.distance, inputs.distance_km),
            rain_mmph: clamp_to(vars, v.rain, inputs.rain_mmph),
            bus_crowd: clamp_to(vars, v.crowd, inputs.bus_crowd),
            rush_index: clamp_to(vars, v.time, inputs.rush_index),
            bus_punctuality: clamp_to(vars, v.punctuality, inputs.bus_punctuality),
            flexibility: clamp_to(vars, v.flexibility, inputs.flexibility),
        }
    }

    /// Scores each mode, picks the best and explains the pick. Never fails.
    pub fn recommend(&self, inputs: &CommuteInputs) -> Recommendation {
        let outputs = self.evaluate(inputs);
        let scores = ModeScores {
            walk: outputs.crisp(self.vars.walk).unwrap_or(NO_EVIDENCE),
            bus: outputs.crisp(self.vars.bus).unwrap_or(NO_EVIDENCE),
            drive: outputs.crisp(self.vars.drive).unwrap_or(NO_EVIDENCE),
        };
        let (label, score) = scores.best();
        let explanation = self.explain(label, score, &outputs);

        debug!(%label, score, walk = scores.walk, bus = scores.bus, drive = scores.drive, "recommended commute mode");

        Recommendation {
            label,
            score,
            memberships: scores.memberships(),
            scores,
            inputs: self.clamp_inputs(inputs),
            explanation: explanation.to_string(),
        }
    }

    fn explain(&self, label: Mode, score: f64, outputs: &Outputs) -> Explanation {
        self.rule_base
            .dominant_terms(outputs)
            .into_iter()
            .fold(
                Explanation::new(format!("{label} (suitability={score:.1}/10)")),
                |explanation, (subject, term, _)| explanation.clause(subject, term),
            )
    }
}

fn clamp_to<I>(vars: &Variables<CommuteTerm>, var: Variable<I>, value: f64) -> f64 {
    vars.get(var).map_or(value, |v| v.clamp(value))
}
