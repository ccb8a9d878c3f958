use crate::commute::model::CommuteInputs;
use crate::commute::Mode;

/// A crisp rule-of-thumb recommendation, independent of the fuzzy rules.
///
/// Useful as a sanity check on the fuzzy output: the thresholds are read top
/// to bottom and the first match wins.
pub fn expected_mode(inputs: &CommuteInputs) -> Mode {
    let CommuteInputs {
        distance_km: d,
        rain_mmph: rain,
        bus_crowd: crowd,
        rush_index: rush,
        bus_punctuality: late,
        flexibility: flex,
    } = *inputs;

    let bus_range = d > 1.5 && d <= 5.;

    if rush >= 0.7 && late >= 0.6 && crowd >= 0.85 {
        Mode::Drive
    } else if d <= 2. && rain < 1.5 && flex >= 0.6 {
        Mode::Walk
    } else if bus_range && rush < 0.5 && late < 0.5 && crowd < 0.8 {
        Mode::Bus
    } else if d > 5. {
        Mode::Drive
    } else if rain >= 2. && late >= 0.5 {
        Mode::Drive
    } else if bus_range {
        Mode::Bus
    } else {
        Mode::Walk
    }
}
