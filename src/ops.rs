use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// Crisp value reported when an output received no activation at all.
///
/// Zero keeps "no rule said anything" apart from a genuine mid-range score.
pub const NO_EVIDENCE: f64 = 0.0;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => ProductionLink::Min.apply(u, v),
            Self::Prod => ProductionLink::Prod.apply(u, v),
            Self::BoundedProd => ProductionLink::BoundedProd.apply(u, v),
            Self::DrasticProd => ProductionLink::DrasticProd.apply(u, v),
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => ProductionLink::Max.apply(u, v),
            Self::ProbOr => ProductionLink::ProbOr.apply(u, v),
            Self::BoundedSum => ProductionLink::BoundedSum.apply(u, v),
            Self::DrasticSum => ProductionLink::DrasticSum.apply(u, v),
        }
    }
}

/// Implication operator: how a rule's firing strength shapes its consequent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ImplicationOp {
    /// Mamdani: clip the consequent at the firing strength
    #[default]
    Clip,
    /// Larsen: scale the consequent by the firing strength
    Scale,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, consequent: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
        consequent.into_iter().map(move |mu| match self {
            Self::Clip => F::min(strength, mu),
            Self::Scale => strength * mu,
        })
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }
}

/// Method for defuzzifcating the resulting membership function.
///
/// Every method returns [`NO_EVIDENCE`] for an all-zero membership.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum DefuzzificationOp {
    /// Center of Gravity, the membership weighted mean of the samples
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    pub fn call(self, universe: &[f64], membership: &[f64]) -> f64 {
        debug_assert_eq!(universe.len(), membership.len());

        let total = membership.iter().sum::<f64>();

        if total.is_nan() || total <= 0. {
            return NO_EVIDENCE;
        }

        match self {
            Self::Cog => {
                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(y, mu)| y * mu)
                    .sum::<f64>();

                num / total
            },
            Self::Boa => {
                if universe.len() < 2 {
                    return universe[0];
                }

                let n_areas = universe.len() - 1;
                let mut cumulative = Vec::with_capacity(universe.len());
                let mut cum_area = 0.;

                cumulative.push(0.);

                for i in 0..n_areas {
                    let base = universe[i + 1] - universe[i];
                    cum_area += (membership[i] + membership[i + 1]) * base / 2.;
                    cumulative.push(cum_area);
                }

                // Invert the cumulative area curve at half the total
                let target = cum_area / 2.;
                let i_area = cumulative.partition_point(|&a| a < target).clamp(1, n_areas);
                let xp = [universe[i_area - 1], universe[i_area]];
                let fp = [cumulative[i_area - 1], cumulative[i_area]];

                interp(target, &fp, &xp)
            },
            Self::Mom => {
                let maxima = maxima(universe, membership);

                maxima.iter().sum::<f64>() / maxima.len() as f64
            },
            Self::Lom => maxima(universe, membership).into_iter().fold(f64::MIN, f64::max),
            Self::Som => maxima(universe, membership).into_iter().fold(f64::MAX, f64::min),
        }
    }
}

fn maxima(universe: &[f64], membership: &[f64]) -> Vec<f64> {
    let maximum = membership.iter().copied().fold(0., f64::max);

    universe
        .iter()
        .zip(membership)
        .filter_map(|(u, m)| if *m == maximum { Some(*u) } else { None })
        .collect()
}
