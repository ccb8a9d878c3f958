//! Variables and rules of the commute model.
//!
//! The bulk of the rules come from a grid over distance, rain and crowding:
//! every cell concludes one suitability level per mode. A short list of
//! override rules then covers time of day, punctuality and flexibility, which
//! the grid does not look at.

use crate::commute::model::CommuteInputs;
use crate::commute::terms::*;
use crate::dsl::Expr;
use crate::error::Result;
use crate::membership::MembershipFunction::{Trapezoidal, Triangular};
use crate::rules::Rules;
use crate::terms::Terms;
use crate::variable::{Variable, Variables};

/// Output universes are sampled finer than inputs so centroids are smooth
const SUITABILITY_STEP: f64 = 0.025;

/// Handles to every variable of the commute model
#[derive(Clone, Copy, Debug)]
pub struct CommuteVariables {
    pub distance: Variable<Distance>,
    pub rain: Variable<Rain>,
    pub crowd: Variable<Crowd>,
    pub time: Variable<TimeOfDay>,
    pub punctuality: Variable<Punctuality>,
    pub flexibility: Variable<Flexibility>,
    pub walk: Variable<Suitability>,
    pub bus: Variable<Suitability>,
    pub drive: Variable<Suitability>,
}

impl CommuteVariables {
    /// Declares the six inputs, in explanation order, then the three mode
    /// outputs. Inputs default to the [`CommuteInputs`] defaults.
    pub fn declare() -> Result<(Variables<CommuteTerm>, Self)> {
        let mut vars = Variables::new();

        let distance_terms = Terms::new()
            .with(Distance::VeryNear, Trapezoidal(0., 0., 1., 2.))?
            .with(Distance::Near, Triangular(1., 2.5, 4.5))?
            .with(Distance::Moderate, Trapezoidal(3., 4.5, 7., 9.))?
            .with(Distance::Far, Triangular(7., 10., 14.))?
            .with(Distance::VeryFar, Trapezoidal(12., 15., 20., 20.))?;
        let rain_terms = Terms::new()
            .with(Rain::Dry, Trapezoidal(0., 0., 0.5, 2.))?
            .with(Rain::Moderate, Trapezoidal(1., 3., 8., 15.))?
            .with(Rain::Heavy, Trapezoidal(10., 20., 100., 100.))?;
        let crowd_terms = Terms::new()
            .with(Crowd::Low, Trapezoidal(0., 0., 0.4, 0.6))?
            .with(Crowd::Medium, Triangular(0.5, 0.75, 1.))?
            .with(Crowd::High, Trapezoidal(0.9, 1.1, 1.5, 1.5))?;
        let time_terms = Terms::new()
            .with(TimeOfDay::OffPeak, Trapezoidal(0., 0., 0.3, 0.6))?
            .with(TimeOfDay::Rush, Trapezoidal(0.4, 0.7, 1., 1.))?;
        let punctuality_terms = Terms::new()
            .with(Punctuality::OnTime, Trapezoidal(0., 0., 0.3, 0.5))?
            .with(Punctuality::Delayed, Trapezoidal(0.5, 0.7, 1., 1.))?;
        let flexibility_terms = Terms::new()
            .with(Flexibility::Low, Trapezoidal(0., 0., 0.3, 0.5))?
            .with(Flexibility::High, Trapezoidal(0.5, 0.7, 1., 1.))?;

        let distance = vars.add("distance", 0. ..=20., distance_terms, None)?;
        let rain = vars.add("rain", 0. ..=100., rain_terms, Some(0.5))?;
        let crowd = vars.add("crowd", 0. ..=1.5, crowd_terms, Some(0.01))?;
        let time = vars.add("time", 0. ..=1., time_terms, Some(0.01))?;
        let punctuality = vars.add("buses", 0. ..=1., punctuality_terms, Some(0.01))?;
        let flexibility = vars.add("flexibility", 0. ..=1., flexibility_terms, Some(0.01))?;

        let walk = vars.add_output("walk", 0. ..=10., suitability_terms()?, Some(SUITABILITY_STEP))?;
        let bus = vars.add_output("bus", 0. ..=10., suitability_terms()?, Some(SUITABILITY_STEP))?;
        let drive = vars.add_output("drive", 0. ..=10., suitability_terms()?, Some(SUITABILITY_STEP))?;

        let defaults = CommuteInputs::default();

        vars.set_default(distance, defaults.distance_km)?;
        vars.set_default(rain, defaults.rain_mmph)?;
        vars.set_default(crowd, defaults.bus_crowd)?;
        vars.set_default(time, defaults.rush_index)?;
        vars.set_default(punctuality, defaults.bus_punctuality)?;
        vars.set_default(flexibility, defaults.flexibility)?;

        let handles = Self {
            distance,
            rain,
            crowd,
            time,
            punctuality,
            flexibility,
            walk,
            bus,
            drive,
        };

        Ok((vars, handles))
    }
}

fn suitability_terms() -> Result<Terms<Suitability>> {
    Terms::new()
        .with(Suitability::Low, Triangular(0., 0., 4.))?
        .with(Suitability::Medium, Triangular(2., 5., 8.))?
        .with(Suitability::High, Triangular(6., 10., 10.))
}

/// Suitability levels one grid cell concludes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CellLevels {
    pub(crate) walk: Suitability,
    pub(crate) bus: Suitability,
    pub(crate) drive: Suitability,
}

pub(crate) fn cell(distance: Distance, rain: Rain, crowd: Crowd) -> CellLevels {
    let short = matches!(distance, Distance::VeryNear | Distance::Near);

    let walk = match (distance, rain) {
        (Distance::VeryNear | Distance::Near, Rain::Dry) => Suitability::High,
        (Distance::VeryNear | Distance::Near, Rain::Moderate) | (Distance::Moderate, Rain::Dry) => {
            Suitability::Medium
        },
        _ => Suitability::Low,
    };

    let mut bus = match distance {
        Distance::VeryNear | Distance::VeryFar => Suitability::Low,
        Distance::Near | Distance::Far => Suitability::Medium,
        Distance::Moderate => Suitability::High,
    };

    if short && rain == Rain::Heavy {
        bus = bus.raise();
    }
    if crowd == Crowd::High {
        bus = bus.lower();
    }

    let mut drive = match distance {
        Distance::VeryNear | Distance::Near => Suitability::Low,
        Distance::Moderate => Suitability::Medium,
        Distance::Far | Distance::VeryFar => Suitability::High,
    };

    if rain == Rain::Heavy {
        drive = drive.raise();
    }
    if crowd == Crowd::High && distance != Distance::VeryNear {
        drive = drive.raise();
    }

    CellLevels { walk, bus, drive }
}

/// Expands the grid and appends the override and baseline rules.
pub fn rule_table(v: &CommuteVariables) -> Rules<CommuteTerm> {
    let cells = Distance::ALL.len() * Rain::ALL.len() * Crowd::ALL.len();
    let mut rules = Rules::with_capacity(cells * 3 + 16);

    for &distance in Distance::ALL {
        for &rain in Rain::ALL {
            for &crowd in Crowd::ALL {
                let premise: Expr<CommuteTerm> = v.distance.is(distance).and2(v.rain.is(rain), v.crowd.is(crowd));
                let levels = cell(distance, rain, crowd);

                rules.add(premise.clone(), v.walk.is(levels.walk));
                rules.add(premise.clone(), v.bus.is(levels.bus));
                rules.add(premise, v.drive.is(levels.drive));
            }
        }
    }

    overrides(v, &mut rules);
    baselines(v, &mut rules);

    rules
}

fn overrides(v: &CommuteVariables, rules: &mut Rules<CommuteTerm>) {
    let short = || -> Expr<CommuteTerm> { v.distance.is_either(Distance::VeryNear, Distance::Near) };
    let roomy = || -> Expr<CommuteTerm> { v.crowd.is_either(Crowd::Low, Crowd::Medium) };
    let flexible = || -> Expr<CommuteTerm> { v.flexibility.is(Flexibility::High) };

    // A short dry trip is a walk for anyone who can spare the time
    rules.add(
        short().and2(v.rain.is(Rain::Dry), flexible()),
        v.walk.is(Suitability::High),
    );
    rules.add(
        short()
            .and2(v.time.is(TimeOfDay::OffPeak), flexible())
            .and(v.rain.is(Rain::Heavy).not()),
        v.walk.is(Suitability::High),
    );
    rules.add(
        v.distance
            .is(Distance::Moderate)
            .and2(v.time.is(TimeOfDay::OffPeak), v.punctuality.is(Punctuality::OnTime))
            .and(roomy()),
        v.bus.is(Suitability::High),
    );

    // Late buses packed at rush hour
    let rush_chaos = || -> Expr<CommuteTerm> {
        v.time
            .is(TimeOfDay::Rush)
            .and2(v.punctuality.is(Punctuality::Delayed), v.crowd.is(Crowd::High))
    };

    rules.add(rush_chaos(), v.drive.is(Suitability::High));
    rules.add(rush_chaos(), v.bus.is(Suitability::Low));
    rules.add(
        v.distance
            .is_either(Distance::Far, Distance::VeryFar)
            .and(v.punctuality.is(Punctuality::Delayed)),
        v.drive.is(Suitability::High),
    );
    rules.add(
        v.distance
            .is(Distance::Moderate)
            .and2(v.rain.is(Rain::Moderate), flexible())
            .and(roomy()),
        v.bus.is(Suitability::High),
    );
    rules.add(
        short().and2(v.rain.is(Rain::Moderate), flexible()),
        v.walk.is(Suitability::Medium),
    );
    rules.add(
        v.time
            .is(TimeOfDay::OffPeak)
            .and2(v.punctuality.is(Punctuality::OnTime), roomy())
            .and(v.distance.is_either(Distance::Near, Distance::Moderate)),
        v.bus.is(Suitability::High),
    );
}

fn baselines(v: &CommuteVariables, rules: &mut Rules<CommuteTerm>) {
    rules.add(v.rain.is(Rain::Heavy), v.walk.is(Suitability::Low));
    rules.add(v.punctuality.is(Punctuality::Delayed), v.bus.is(Suitability::Low));
    rules.add(v.flexibility.is(Flexibility::Low), v.walk.is(Suitability::Low));
    rules.add(
        v.time.is(TimeOfDay::Rush).and(v.crowd.is(Crowd::High)),
        v.bus.is(Suitability::Low),
    );
}
