// z/OS name rules for datasets and PDS members
//
// The character class admits digits anywhere after the first position, for
// every qualifier, not only the first one. Kept as-is.

use crate::domain::error::{DomainError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum dataset name length (all qualifiers plus periods)
pub const MAX_DATASET_NAME_LEN: usize = 44;

/// Maximum PDS member name length
pub const MAX_MEMBER_NAME_LEN: usize = 8;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z@#$][A-Z0-9@#$.-]*$").expect("name pattern is a valid regex")
});

/// Validate a dataset name according to z/OS naming conventions
///
/// Checks, in order: empty, length, character set, `..`,
/// leading/trailing period, `--`.
pub fn validate_dataset_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Err(DomainError::InvalidDatasetName(reason.to_string()));

    if name.is_empty() {
        return invalid("dataset name cannot be empty");
    }
    if name.len() > MAX_DATASET_NAME_LEN {
        return invalid("dataset name cannot exceed 44 characters");
    }
    if !NAME_PATTERN.is_match(name) {
        return invalid("dataset name contains invalid characters");
    }
    if name.contains("..") {
        return invalid("dataset name cannot contain consecutive periods");
    }
    if name.starts_with('.') || name.ends_with('.') {
        return invalid("dataset name cannot start or end with a period");
    }
    if name.contains("--") {
        return invalid("dataset name cannot contain consecutive hyphens");
    }

    Ok(())
}

/// Validate a PDS member name according to z/OS naming conventions
pub fn validate_member_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Err(DomainError::InvalidMemberName(reason.to_string()));

    if name.is_empty() {
        return invalid("member name cannot be empty");
    }
    if name.len() > MAX_MEMBER_NAME_LEN {
        return invalid("member name cannot exceed 8 characters");
    }
    if !NAME_PATTERN.is_match(name) {
        return invalid("member name contains invalid characters");
    }
    if name.contains("..") {
        return invalid("member name cannot contain consecutive periods");
    }
    if name.starts_with('.') || name.ends_with('.') {
        return invalid("member name cannot start or end with a period");
    }

    Ok(())
}

pub fn is_valid_dataset_name(name: &str) -> bool {
    validate_dataset_name(name).is_ok()
}

pub fn is_valid_member_name(name: &str) -> bool {
    validate_member_name(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dataset_names() {
        for name in ["TEST.DATA", "USER.JCL.CNTL", "@SYS.#WORK.$TMP", "A", "HLQ.A1-B2"] {
            assert!(is_valid_dataset_name(name), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_dataset_names() {
        let too_long = format!("{}.{}", "A".repeat(30), "B".repeat(14));
        assert_eq!(too_long.len(), 45);

        for name in [
            "",
            too_long.as_str(),
            "test.data",
            "1TEST.DATA",
            ".TEST.DATA",
            "TEST.DATA.",
            "TEST..DATA",
            "TEST.DA--TA",
            "TEST DATA",
        ] {
            assert!(!is_valid_dataset_name(name), "{:?} should be invalid", name);
        }
    }

    #[test]
    fn test_dataset_name_error_reasons() {
        let err = validate_dataset_name("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let err = validate_dataset_name("TEST..DATA").unwrap_err();
        assert!(err.to_string().contains("consecutive periods"));

        let err = validate_dataset_name("TEST.").unwrap_err();
        assert!(err.to_string().contains("start or end with a period"));

        let err = validate_dataset_name("A--B").unwrap_err();
        assert!(err.to_string().contains("consecutive hyphens"));
    }

    #[test]
    fn test_digit_after_period_is_accepted() {
        // Qualifiers after the first may start with a digit under this pattern.
        assert!(is_valid_dataset_name("TEST.1DATA"));
    }

    #[test]
    fn test_exactly_44_characters_is_valid() {
        let name = format!("{}.{}", "A".repeat(30), "B".repeat(13));
        assert_eq!(name.len(), 44);
        assert!(is_valid_dataset_name(&name));
    }

    #[test]
    fn test_member_names() {
        assert!(is_valid_member_name("MEMBER1"));
        assert!(is_valid_member_name("$ABC"));
        assert!(is_valid_member_name("ABCDEFGH"));

        assert!(!is_valid_member_name(""));
        assert!(!is_valid_member_name("TOOLONG12"));
        assert!(!is_valid_member_name("member1"));
        assert!(!is_valid_member_name("1MEMBER"));
        assert!(!is_valid_member_name("MEM."));

        let err = validate_member_name("TOOLONG12").unwrap_err();
        assert!(err.to_string().contains("cannot exceed 8 characters"));
    }
}
