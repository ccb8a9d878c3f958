use approx::assert_abs_diff_eq;
use fuzzy_commute::{expected_mode, CommuteInputs, CommuteModel, ConfigError, Mode, Recommendation};

fn recommend(inputs: CommuteInputs) -> Recommendation {
    CommuteModel::global().unwrap().recommend(&inputs)
}

#[test]
fn test_short_dry_trip_walks() {
    let recommendation = recommend(CommuteInputs::new(1., 0., 0.2));
    let scores = recommendation.scores;

    assert_eq!(recommendation.label, Mode::Walk);
    assert!(scores.walk - scores.bus > 3., "{scores:?}");
    assert!(scores.walk - scores.drive > 3., "{scores:?}");
    assert_eq!(
        recommendation.explanation,
        "Walk (suitability=8.7/10) — distance very near, rain dry, crowd low, time off-peak, buses on time, \
         flexibility high."
    );
}

#[test]
fn test_long_wet_trip_drives() {
    let recommendation = recommend(CommuteInputs::new(15., 50., 0.5));

    assert_eq!(recommendation.label, Mode::Drive);
    assert!(recommendation.score > 7., "{:?}", recommendation.scores);
    assert!(recommendation.explanation.starts_with("Drive (suitability="));
    assert!(recommendation.explanation.contains("— distance very far, rain heavy, crowd low,"));
}

#[test]
fn test_moderate_trip_in_drizzle_takes_the_bus() {
    let recommendation = recommend(CommuteInputs::new(4., 5., 0.3));
    let scores = recommendation.scores;

    assert_eq!(recommendation.label, Mode::Bus);
    assert!(scores.bus > scores.drive && scores.bus > scores.walk, "{scores:?}");
    assert!(recommendation
        .explanation
        .contains("distance moderate, rain moderate, crowd low, time off-peak, buses on time, flexibility high."));
}

#[test]
fn test_balanced_trip_ties_go_to_walking() {
    let recommendation = recommend(CommuteInputs::new(0.5, 15., 0.6));
    let scores = recommendation.scores;

    assert_abs_diff_eq!(scores.walk, scores.bus, epsilon = 1e-6);
    assert_abs_diff_eq!(scores.bus, scores.drive, epsilon = 1e-6);
    assert_eq!(recommendation.label, Mode::Walk);
    assert!(recommendation.explanation.starts_with("Walk (suitability="));
}

#[test]
fn test_heuristic_agrees_on_scenarios() {
    for (inputs, mode) in [
        (CommuteInputs::new(1., 0., 0.2), Mode::Walk),
        (CommuteInputs::new(15., 50., 0.5), Mode::Drive),
        (CommuteInputs::new(4., 5., 0.3), Mode::Bus),
    ] {
        assert_eq!(recommend(inputs).label, mode);
        assert_eq!(expected_mode(&inputs), mode);
    }
}

#[test]
fn test_score_and_memberships_agree() {
    let recommendation = recommend(CommuteInputs::default());
    let (walk, bus, drive) = recommendation.memberships;

    assert_eq!(recommendation.score, recommendation.scores.get(recommendation.label));
    assert_abs_diff_eq!(walk, recommendation.scores.walk / 10., epsilon = 1e-12);
    assert_abs_diff_eq!(bus, recommendation.scores.bus / 10., epsilon = 1e-12);
    assert_abs_diff_eq!(drive, recommendation.scores.drive / 10., epsilon = 1e-12);
    assert_eq!(recommendation.inputs, CommuteInputs::default());
}

#[test]
fn test_out_of_range_inputs_are_echoed_clamped() {
    let inputs = CommuteInputs {
        distance_km: 500.,
        rain_mmph: -10.,
        bus_crowd: f64::INFINITY,
        rush_index: f64::NAN,
        bus_punctuality: 2.,
        flexibility: -1.,
    };

    let recommendation = recommend(inputs);

    assert_eq!(
        recommendation.inputs,
        CommuteInputs {
            distance_km: 20.,
            rain_mmph: 0.,
            bus_crowd: 1.5,
            rush_index: 0.,
            bus_punctuality: 1.,
            flexibility: 0.,
        }
    );
    assert!((0. ..=10.).contains(&recommendation.score));
}

#[test]
fn test_global_model_is_shared() {
    let a = CommuteModel::global().unwrap();
    let b = CommuteModel::global().unwrap();

    assert!(std::ptr::eq(a, b));

    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || recommend(CommuteInputs::new(i as f64 * 5., 0., 0.4)).label))
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_set_by_name() {
    let mut inputs = CommuteInputs::default();

    inputs.set("distance", 4.).unwrap();
    inputs.set("rain", 5.).unwrap();
    inputs.set("crowd", 0.3).unwrap();

    assert_eq!(recommend(inputs).label, Mode::Bus);
    assert!(matches!(inputs.set("speed", 3.), Err(ConfigError::UnknownInput { .. })));
}

#[test]
fn test_recommendation_serializes() {
    let recommendation = recommend(CommuteInputs::new(1., 0., 0.2));
    let json = serde_json::to_value(&recommendation).unwrap();

    assert_eq!(json["label"], "Walk");
    assert_eq!(json["inputs"]["distance_km"], 1.);
    assert!(json["explanation"].as_str().unwrap().starts_with("Walk"));

    let back: Recommendation = serde_json::from_value(json).unwrap();

    assert_eq!(back.label, recommendation.label);
    assert_eq!(back.explanation, recommendation.explanation);
    assert_eq!(back.inputs, recommendation.inputs);

    let partial: CommuteInputs = serde_json::from_str(r#"{ "distance_km": 4.0 }"#).unwrap();

    assert_eq!(partial.distance_km, 4.);
    assert_eq!(partial.flexibility, CommuteInputs::default().flexibility);
}
