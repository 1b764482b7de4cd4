use std::cell::Cell;
use std::collections::BTreeMap;

use intake_ingest::{
    ClassifyError, Classifier, FieldSummary, KeywordClassifier, TagAssignments, TaggingOptions,
    enrich_json, tag_observations,
};
use intake_model::{ObservedType, SemanticType};
use intake_registry::TagVocabulary;

const APPLICATION: &str = include_str!("fixtures/application.json");

fn vocabulary() -> TagVocabulary {
    TagVocabulary::load_default().expect("load default vocabulary")
}

#[test]
fn enriches_sample_application() {
    let observations = enrich_json(APPLICATION, "application").expect("enrich sample");
    assert_eq!(observations.len(), 30);

    let dob = &observations["date_of_birth"];
    assert_eq!(dob.normalized_name.as_deref(), Some("date of birth"));
    assert_eq!(dob.semantic_type, SemanticType::Date);
    assert_eq!(dob.value_length, 10);
    assert_eq!(dob.path, "applicant.date_of_birth");

    let expectations = [
        ("first_name", SemanticType::Letters, 4),
        ("number_of_dependants", SemanticType::Number, 1),
        ("national_insurance_number", SemanticType::NumbersAndLetters, 9),
        ("email_address", SemanticType::Unknown, 20),
        ("mobile_phone_number", SemanticType::Number, 11),
        ("postcode", SemanticType::NumbersAndLetters, 8),
        ("annual_income", SemanticType::Number, 5),
        ("adverse_credit_history", SemanticType::Boolean, 5),
        ("consent_to_credit_check", SemanticType::Boolean, 4),
    ];
    for (key, semantic_type, length) in expectations {
        let observation = &observations[key];
        assert_eq!(observation.semantic_type, semantic_type, "{key}");
        assert_eq!(observation.value_length, length, "{key}");
    }

    let income = &observations["annual_income"];
    assert_eq!(income.value.as_deref(), Some("65000"));
    assert_eq!(income.observed_type, Some(ObservedType::Number));
    assert_eq!(
        observations["adverse_credit_history"].observed_type,
        Some(ObservedType::Boolean)
    );
}

#[test]
fn keyword_tagging_of_sample_application() {
    let vocabulary = vocabulary();
    let mut observations = enrich_json(APPLICATION, "application").expect("enrich sample");
    let report = tag_observations(
        &mut observations,
        &KeywordClassifier,
        &vocabulary,
        &TaggingOptions::default(),
    );
    assert_eq!(report.batches, 1);
    assert!(report.is_complete());
    assert_eq!(report.tagged + report.untagged, 30);

    let tags = |key: &str| -> Vec<&str> {
        observations[key].tags.iter().map(String::as_str).collect()
    };
    assert_eq!(tags("first_name"), vec!["identity", "personal_name"]);
    assert!(tags("date_of_birth").is_empty());
    assert_eq!(tags("mobile_phone_number"), vec!["contact_information"]);
    assert_eq!(tags("current_address"), vec!["address", "current"]);
    assert_eq!(
        tags("consent_to_credit_check"),
        vec!["consent", "credit", "financial", "legal"]
    );
}

/// Fails every other batch and counts calls.
struct FlakyClassifier {
    calls: Cell<usize>,
}

impl Classifier for FlakyClassifier {
    fn classify(
        &self,
        fields: &BTreeMap<String, FieldSummary>,
        vocabulary: &TagVocabulary,
    ) -> Result<TagAssignments, ClassifyError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call % 2 == 1 {
            return Err(ClassifyError::Backend("timeout".to_string()));
        }
        let mut assignments = KeywordClassifier.classify(fields, vocabulary)?;
        assignments.insert("not_in_batch".to_string(), vec!["identity".to_string()]);
        Ok(assignments)
    }
}

#[test]
fn failed_batches_stay_untagged() {
    let vocabulary = vocabulary();
    let mut observations = enrich_json(APPLICATION, "application").expect("enrich sample");
    let classifier = FlakyClassifier {
        calls: Cell::new(0),
    };
    let report = tag_observations(
        &mut observations,
        &classifier,
        &vocabulary,
        &TaggingOptions::default().with_batch_size(10),
    );
    assert_eq!(report.batches, 3);
    assert_eq!(report.failed_batches, 1);
    assert!(!report.is_complete());
    assert_eq!(classifier.calls.get(), 3);
    assert!(!observations.contains_key("not_in_batch"));

    // Keys are batched in document order; the second batch of ten failed.
    let keys: Vec<&String> = observations.keys().collect();
    for key in &keys[10..20] {
        assert!(observations[*key].tags.is_empty(), "{key}");
    }
    assert_eq!(keys[10], "postcode");
    assert!(observations["annual_income"].tags.is_empty());
    assert!(!observations["first_name"].tags.is_empty());
}

#[test]
fn zero_batch_size_is_treated_as_one() {
    let vocabulary = vocabulary();
    let mut observations =
        enrich_json(r#"{"a": {"loan_amount": 1000, "job_title": "Nurse"}}"#, "record")
            .expect("enrich record");
    let report = tag_observations(
        &mut observations,
        &KeywordClassifier,
        &vocabulary,
        &TaggingOptions::default().with_batch_size(0),
    );
    assert_eq!(report.batches, 2);
    assert_eq!(report.tagged, 2);
}

#[test]
fn rejects_arrays_in_records() {
    let err = enrich_json(r#"{"applicant": {"names": ["John", "Jo"]}}"#, "record")
        .expect_err("arrays are unsupported");
    insta::assert_snapshot!(err.to_string(), @"array values are not supported (at applicant.names)");
}
