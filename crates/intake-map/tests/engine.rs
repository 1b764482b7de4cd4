use intake_map::{RankOptions, RankingEngine, ShapeOptions, shape};
use intake_model::{ExternalFieldObservation, Observations, SemanticType};
use intake_registry::Registry;

fn observation(
    name: &str,
    semantic_type: SemanticType,
    length: usize,
    tags: &[&str],
) -> ExternalFieldObservation {
    ExternalFieldObservation::new(name.replace(' ', "_"), semantic_type, length)
        .with_normalized_name(name)
        .with_tags(tags.iter().copied())
}

fn sample() -> Observations {
    let mut observations = Observations::new();
    let mut add = |key: &str, obs: ExternalFieldObservation| {
        observations.insert(key.to_string(), obs);
    };
    add(
        "date_of_birth",
        observation(
            "date of birth",
            SemanticType::Date,
            10,
            &["identity", "personal_details"],
        ),
    );
    add(
        "postcode",
        observation(
            "postcode",
            SemanticType::NumbersAndLetters,
            8,
            &["address"],
        ),
    );
    add(
        "annual_income",
        observation(
            "annual income",
            SemanticType::Number,
            5,
            &["income", "financial"],
        ),
    );
    add(
        "marital_status",
        observation("marital status", SemanticType::Letters, 7, &[]),
    );
    add(
        "previous_postcode",
        observation(
            "previous postcode",
            SemanticType::Text,
            7,
            &["address", "previous"],
        ),
    );
    add(
        "favourite_colour",
        observation("favourite colour", SemanticType::Letters, 4, &[]),
    );
    add(
        "fname",
        ExternalFieldObservation::new("First-Name", SemanticType::Letters, 4)
            .with_tags(["personal_name", "identity"]),
    );
    observations
}

fn ranked(matches: &intake_map::Matches, key: &str) -> Vec<(String, f64)> {
    matches[key]
        .iter()
        .map(|c| (c.internal_key.clone(), c.total))
        .collect()
}

#[test]
fn every_observation_key_is_present_in_input_order() {
    let registry = Registry::load_default().expect("load default registry");
    let observations = sample();
    let matches = RankingEngine::new(&registry).rank(&observations);
    assert_eq!(
        matches.keys().collect::<Vec<_>>(),
        observations.keys().collect::<Vec<_>>()
    );
    assert!(matches["favourite_colour"].is_empty());
}

#[test]
fn ranks_against_default_registry() {
    let registry = Registry::load_default().expect("load default registry");
    let matches = RankingEngine::new(&registry).rank(&sample());

    assert_eq!(
        ranked(&matches, "date_of_birth"),
        vec![("date_of_birth".to_string(), 0.8504)]
    );
    assert_eq!(
        ranked(&matches, "annual_income"),
        vec![
            ("annual_income".to_string(), 0.7901),
            ("other_income".to_string(), 0.7377),
        ]
    );
    assert_eq!(
        ranked(&matches, "marital_status"),
        vec![("marital_status".to_string(), 0.75)]
    );
    assert_eq!(
        ranked(&matches, "previous_postcode"),
        vec![
            ("previous_address_postcode".to_string(), 0.8504),
            ("postcode".to_string(), 0.6177),
            ("previous_address".to_string(), 0.6099),
        ]
    );
    assert_eq!(
        ranked(&matches, "fname"),
        vec![
            ("first_name".to_string(), 0.8504),
            ("last_name".to_string(), 0.7903),
        ]
    );
}

#[test]
fn type_gate_drops_otherwise_exact_names() {
    let registry = Registry::load_default().expect("load default registry");
    let matches = RankingEngine::new(&registry).rank(&sample());
    // The registry's postcode is free text; a numbers-and-letters value is
    // rejected by type even though the name is exact.
    assert!(matches["postcode"].is_empty());
}

#[test]
fn candidates_carry_rounded_breakdowns() {
    let registry = Registry::load_default().expect("load default registry");
    let matches = RankingEngine::new(&registry).rank(&sample());
    let best = &matches["previous_postcode"][2];
    let components = best.components.expect("scored candidate has components");
    assert_eq!(components.name, 0.7);
    assert_eq!(components.tags, 0.191);
    assert_eq!(components.length, 0.948);
    let weighted = best.weighted.expect("scored candidate has weighted");
    assert_eq!(weighted.length, 0.142);
}

#[test]
fn parallel_ranking_matches_sequential() {
    let registry = Registry::load_default().expect("load default registry");
    let observations = sample();
    let sequential = RankingEngine::new(&registry).rank(&observations);
    let parallel = RankingEngine::new(&registry)
        .with_options(RankOptions::default().with_parallel(true))
        .rank(&observations);
    assert_eq!(sequential, parallel);
    assert!(sequential.keys().eq(parallel.keys()));
}

#[test]
fn shaping_ranked_output() {
    let registry = Registry::load_default().expect("load default registry");
    let matches = RankingEngine::new(&registry).rank(&sample());

    let shaped = shape(&matches, &ShapeOptions::default().with_top_n(Some(1)))
        .expect("valid options");
    assert_eq!(shaped.len(), 5);
    assert!(shaped.values().all(|c| c.len() == 1));
    assert_eq!(
        shaped["previous_postcode"].get("previous_address_postcode"),
        Some(0.8504)
    );

    let shaped = shape(&matches, &ShapeOptions::default().with_min_score(0.8))
        .expect("valid options");
    assert_eq!(
        shaped.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["date_of_birth", "previous_postcode", "fname"]
    );
}
