// crates/aws-api-gate-core/src/core/names.rs
// ============================================================================
// Module: Name Normalization
// Description: Mapping between CLI tokens, SDK names, and parameter flags.
// Purpose: Give every lookup one canonical spelling for services and operations.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Command tokens arrive in whatever case the caller typed. Catalog lookups
//! happen on the normalized, hyphenated form, and SDK names in `PascalCase`
//! are hyphenated the same way the AWS CLI derives its command names
//! (`DescribeDBInstances` becomes `describe-db-instances`).

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a service or operation token for catalog lookups.
///
/// Surrounding whitespace is removed, ASCII letters are lower-cased and
/// underscores become hyphens.
#[must_use]
pub fn normalize_token(token: &str) -> String {
    token
        .trim()
        .chars()
        .map(|ch| if ch == '_' { '-' } else { ch.to_ascii_lowercase() })
        .collect()
}

/// Converts a `PascalCase` SDK name into its hyphenated CLI spelling.
///
/// A hyphen is inserted before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym that is
/// followed by a lowercase letter. Digits stay attached to the preceding word.
#[must_use]
pub fn pascal_to_kebab(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut output = String::with_capacity(name.len() + 8);
    for (index, ch) in chars.iter().copied().enumerate() {
        if ch.is_ascii_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word && !output.ends_with('-') {
                output.push('-');
            }
        }
        if ch == '_' {
            output.push('-');
        } else {
            output.push(ch.to_ascii_lowercase());
        }
    }
    output
}

/// Returns the CLI flag for a canonical parameter name.
#[must_use]
pub fn flag_for_parameter(name: &str) -> String {
    format!("--{}", pascal_to_kebab(name))
}

/// Returns true when the token has the shape of a `--flag`.
#[must_use]
pub fn is_flag(token: &str) -> bool {
    token.len() > 2 && token.starts_with("--")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_names_hyphenate_like_cli_commands() {
        assert_eq!(pascal_to_kebab("GetCallerIdentity"), "get-caller-identity");
        assert_eq!(pascal_to_kebab("DescribeDBInstances"), "describe-db-instances");
        assert_eq!(pascal_to_kebab("CreateEnvironmentEC2"), "create-environment-ec2");
        assert_eq!(pascal_to_kebab("ListObjectsV2"), "list-objects-v2");
        assert_eq!(pascal_to_kebab("ResourceARN"), "resource-arn");
        assert_eq!(pascal_to_kebab("InstanceIds"), "instance-ids");
    }

    #[test]
    fn already_hyphenated_names_are_stable() {
        assert_eq!(pascal_to_kebab("list-buckets"), "list-buckets");
        assert_eq!(pascal_to_kebab("ls"), "ls");
    }

    #[test]
    fn tokens_normalize_case_and_underscores() {
        assert_eq!(normalize_token("  EC2 "), "ec2");
        assert_eq!(normalize_token("Describe_Instances"), "describe-instances");
    }

    #[test]
    fn parameter_flags_derive_from_canonical_names() {
        assert_eq!(flag_for_parameter("ImageId"), "--image-id");
        assert_eq!(flag_for_parameter("ResourceARN"), "--resource-arn");
        assert!(is_flag("--region"));
        assert!(!is_flag("--"));
        assert!(!is_flag("-1"));
    }
}
