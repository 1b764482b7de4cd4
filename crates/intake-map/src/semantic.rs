use intake_model::SemanticType;

/// `1.0` when the observed type equals the expected type, else `0.0`.
/// There is no partial credit between related types.
pub fn type_score(observed: SemanticType, expected: SemanticType) -> f64 {
    if observed == expected { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_types_are_compatible() {
        assert_eq!(type_score(SemanticType::Date, SemanticType::Date), 1.0);
        assert_eq!(type_score(SemanticType::Letters, SemanticType::Number), 0.0);
        assert_eq!(type_score(SemanticType::Letters, SemanticType::Text), 0.0);
        assert_eq!(
            type_score(SemanticType::NumbersAndLetters, SemanticType::Text),
            0.0
        );
    }
}
