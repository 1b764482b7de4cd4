use std::fs;

use intake_model::SemanticType;
use intake_registry::{Registry, RegistryError, TagVocabulary};

#[test]
fn default_registry_tags_are_in_vocabulary() {
    let registry = Registry::load_default().expect("load default registry");
    for field in &registry {
        for tag in &field.tags {
            assert!(
                registry.vocabulary().contains(tag),
                "{} uses unknown tag {tag}",
                field.key
            );
        }
    }
}

#[test]
fn default_registry_keys_are_unique_and_ordered() {
    let registry = Registry::load_default().expect("load default registry");
    let keys: Vec<&str> = registry.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys.first(), Some(&"first_name"));
    assert_eq!(keys.last(), Some(&"school_fees"));
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), keys.len());
}

#[test]
fn default_registry_uses_richer_types() {
    let registry = Registry::load_default().expect("load default registry");
    assert_eq!(
        registry.get("email_address").map(|f| f.field_type),
        Some(SemanticType::Email)
    );
    assert_eq!(
        registry.get("current_address").map(|f| f.field_type),
        Some(SemanticType::Text)
    );
}

#[test]
fn load_from_path_reads_custom_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fields.json");
    fs::write(
        &path,
        r#"[
            {
                "key": "pet_name",
                "type": "letters",
                "expected_length": [2, 20],
                "tags": ["identity"],
                "synonyms": ["pet name", "name of pet"]
            }
        ]"#,
    )
    .expect("write catalog");

    let vocabulary = TagVocabulary::load_default().expect("vocabulary");
    let registry = Registry::load_from_path(&path, vocabulary).expect("load catalog");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.fields()[0].synonyms[1], "name of pet");
}

#[test]
fn load_from_path_fails_fast_on_inverted_range() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fields.json");
    fs::write(
        &path,
        r#"[{"key": "postcode", "type": "string", "expected_length": [8, 5],
             "tags": ["postcode"], "synonyms": ["postcode"]}]"#,
    )
    .expect("write catalog");

    let vocabulary = TagVocabulary::load_default().expect("vocabulary");
    let err = Registry::load_from_path(&path, vocabulary).expect_err("inverted range");
    assert!(matches!(err, RegistryError::InvalidLength { .. }));
    assert!(err.to_string().contains("postcode"));
}

#[test]
fn load_from_path_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vocabulary = TagVocabulary::load_default().expect("vocabulary");
    let err = Registry::load_from_path(&dir.path().join("missing.json"), vocabulary)
        .expect_err("missing file");
    assert!(matches!(err, RegistryError::Io { .. }));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let vocabulary = TagVocabulary::load_default().expect("vocabulary");
    let err = Registry::from_json("[{\"key\": 1}]", "inline", vocabulary).expect_err("bad json");
    assert!(matches!(err, RegistryError::Json { .. }));
    assert!(err.to_string().starts_with("failed to parse inline"));
}
