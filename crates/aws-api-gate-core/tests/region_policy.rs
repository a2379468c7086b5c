// crates/aws-api-gate-core/tests/region_policy.rs
// ============================================================================
// Module: Region and Policy Tests
// Description: Region precedence and read-only classification.
// ============================================================================
//! ## Overview
//! Covers region resolution from flags, ARNs, and defaults, and the
//! read-only allowlist for API operations and customizations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use aws_api_gate_core::IRTranslation;
use aws_api_gate_core::PolicyError;
use aws_api_gate_core::ReadOnlyOperations;
use aws_api_gate_core::SchemaCatalog;
use aws_api_gate_core::is_operation_read_only;
use aws_api_gate_core::resolve_region;
use aws_api_gate_core::translate_cli_to_ir;
use support::catalog;

fn translate(text: &str) -> IRTranslation {
    translate_cli_to_ir(&catalog(), text).unwrap()
}

// ============================================================================
// SECTION: Region
// ============================================================================

#[test]
fn explicit_region_flag_wins() {
    let ir = translate(
        "aws cloudwatch list-managed-insight-rules --region us-west-2 \
         --resource-arn arn:aws:cloudwatch:eu-west-2:123456789012:alarm:X",
    );
    assert_eq!(resolve_region(&ir, "us-east-1"), "us-west-2");
}

#[test]
fn arn_region_beats_the_default() {
    let ir = translate(
        "aws cloudwatch list-managed-insight-rules \
         --resource-arn arn:aws:cloudwatch:eu-west-2:123456789012:alarm:X",
    );
    assert_eq!(resolve_region(&ir, "us-east-1"), "eu-west-2");
}

#[test]
fn region_flag_before_the_service_counts() {
    let ir = translate("aws --region ap-south-1 sts get-caller-identity");
    assert_eq!(resolve_region(&ir, "us-east-1"), "ap-south-1");
}

#[test]
fn global_arns_fall_back_to_the_default() {
    let ir = translate("aws iam get-role --role-name arn:aws:iam::123456789012:role/admin");
    assert_eq!(resolve_region(&ir, "eu-north-1"), "eu-north-1");
}

#[test]
fn blank_default_uses_the_fallback_region() {
    let ir = translate("aws sts get-caller-identity");
    assert_eq!(resolve_region(&ir, "  "), "us-east-1");
    assert_eq!(resolve_region(&ir, "eu-west-3"), "eu-west-3");
}

#[test]
fn region_resolution_is_deterministic() {
    let ir = translate(
        "aws cloudwatch list-managed-insight-rules \
         --resource-arn arn:aws:cloudwatch:eu-west-2:123456789012:alarm:X",
    );
    assert_eq!(resolve_region(&ir, "us-east-1"), resolve_region(&ir, "us-east-1"));
}

// ============================================================================
// SECTION: Read-Only Policy
// ============================================================================

#[test]
fn catalog_allowlist_classifies_operations() {
    let table = catalog().read_only_operations();
    let cases = [
        ("aws sts get-caller-identity", true),
        ("aws s3api list-buckets", true),
        ("aws ec2 describe-instances", true),
        ("aws ec2 revoke-security-group-ingress --group-id sg-12345678", false),
        ("aws cloud9 delete-environment --environment-id abcdefgh12", false),
        ("aws s3 ls", true),
        ("aws s3 cp a.txt s3://bucket/a.txt", false),
        ("aws configure list", true),
    ];
    for (command, expected) in cases {
        let ir = translate(command);
        assert_eq!(is_operation_read_only(&ir, &table), Ok(expected), "{command}");
    }
}

#[test]
fn unknown_operations_are_not_read_only() {
    let table = catalog().read_only_operations();
    let ir = translate("aws s3api list-bucketz");
    assert_eq!(is_operation_read_only(&ir, &table), Ok(false));
}

#[test]
fn unlisted_services_are_not_read_only() {
    let mut table = ReadOnlyOperations::new();
    table.insert("ec2", "DescribeInstances");
    let ir = translate("aws sts get-caller-identity");
    assert_eq!(is_operation_read_only(&ir, &table), Ok(false));
    let ir = translate("aws ec2 describe-instances");
    assert_eq!(is_operation_read_only(&ir, &table), Ok(true));
}

#[test]
fn incomplete_translations_are_errors() {
    let table = catalog().read_only_operations();
    let err = is_operation_read_only(&IRTranslation::default(), &table).unwrap_err();
    assert_eq!(err, PolicyError::IncompleteTranslation);
    assert_eq!(
        err.to_string(),
        "failed to check if operation is allowed: translated command doesn't include service and \
         operation name"
    );
}
