//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::DependencyType;

/// Validate an issue ID.
///
/// IDs are free-form but must be non-empty and free of whitespace.
pub fn validate_issue_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Issue ID cannot be empty".to_string());
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Invalid issue ID '{s}': IDs cannot contain whitespace"));
    }

    Ok(s.to_string())
}

/// Parse a dependency type tag.
///
/// Known tags map to their variant; anything else is kept as a custom tag.
pub fn validate_dependency_type(s: &str) -> Result<DependencyType, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Dependency type cannot be empty".to_string());
    }

    Ok(DependencyType::from(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("proj-abc", "proj-abc")]
    #[case("  bd-12  ", "bd-12")]
    #[case("x", "x")]
    fn test_validate_issue_id_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_issue_id(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", "cannot be empty")]
    #[case("   ", "cannot be empty")]
    #[case("a b", "whitespace")]
    fn test_validate_issue_id_rejects(#[case] input: &str, #[case] expected_error: &str) {
        let err = validate_issue_id(input).unwrap_err();
        assert!(err.contains(expected_error), "got '{err}'");
    }

    #[rstest]
    #[case("blocks", DependencyType::Blocks)]
    #[case("parent-child", DependencyType::ParentChild)]
    #[case(" waits-for ", DependencyType::WaitsFor)]
    #[case("tracks", DependencyType::from("tracks"))]
    fn test_validate_dependency_type(#[case] input: &str, #[case] expected: DependencyType) {
        assert_eq!(validate_dependency_type(input).unwrap(), expected);
    }

    #[test]
    fn test_validate_dependency_type_rejects_empty() {
        assert!(validate_dependency_type("").is_err());
    }
}
