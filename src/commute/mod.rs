//! The commute recommender: six inputs, one suitability output per mode and
//! the rule table tying them together.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod heuristic;
pub mod model;
pub mod rule_table;
pub mod terms;

/// A way of getting to work
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Mode {
    Walk,
    Bus,
    Drive,
}

impl Mode {
    /// Every mode, in tie-break priority order
    pub const ALL: [Mode; 3] = [Mode::Walk, Mode::Bus, Mode::Drive];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Walk => "Walk",
            Mode::Bus => "Bus",
            Mode::Drive => "Drive",
        })
    }
}

/// Scores closer than this are tied. Centroids of mirror image aggregates
/// differ only in the last few bits.
const TIE_TOLERANCE: f64 = 1e-6;

/// Defuzzified suitability of each mode, on a 0 to 10 scale
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeScores {
    pub walk: f64,
    pub bus: f64,
    pub drive: f64,
}

impl ModeScores {
    pub fn get(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Walk => self.walk,
            Mode::Bus => self.bus,
            Mode::Drive => self.drive,
        }
    }

    /// The highest scoring mode and its score. Scores within a rounding error
    /// of each other are equal, and equal scores go to the mode listed first
    /// in [`Mode::ALL`].
    pub fn best(&self) -> (Mode, f64) {
        let mut best = (Mode::Walk, self.walk);

        for mode in [Mode::Bus, Mode::Drive] {
            let score = self.get(mode);

            if score > best.1 + TIE_TOLERANCE {
                best = (mode, score);
            }
        }

        best
    }

    /// Scores rescaled to [0, 1], in walk, bus, drive order
    pub fn memberships(&self) -> (f64, f64, f64) {
        (self.walk / 10., self.bus / 10., self.drive / 10.)
    }
}

#[test]
fn test_best_breaks_ties_by_priority() {
    let scores = ModeScores {
        walk: 3.,
        bus: 6.,
        drive: 6.,
    };

    assert_eq!(scores.best(), (Mode::Bus, 6.));
    assert_eq!(ModeScores::default().best(), (Mode::Walk, 0.));
    assert_eq!(
        ModeScores {
            walk: 1.,
            bus: 2.,
            drive: 9.5
        }
        .best(),
        (Mode::Drive, 9.5)
    );
}

#[test]
fn test_near_equal_scores_are_tied() {
    let scores = ModeScores {
        walk: 5.000000000000001,
        bus: 5.000000000000007,
        drive: 4.999999999999998,
    };

    assert_eq!(scores.best().0, Mode::Walk);

    let scores = ModeScores {
        walk: 4.,
        bus: 5.000000000000002,
        drive: 5.,
    };

    assert_eq!(scores.best().0, Mode::Bus);
    assert_eq!(ModeScores { walk: 5., bus: 5.01, drive: 0. }.best().0, Mode::Bus);
}

#[test]
fn test_memberships_scale_scores() {
    let scores = ModeScores {
        walk: 10.,
        bus: 5.,
        drive: 0.,
    };

    assert_eq!(scores.memberships(), (1., 0.5, 0.));
    assert_eq!(Mode::Drive.to_string(), "Drive");
}
