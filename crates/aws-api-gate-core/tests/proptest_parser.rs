// crates/aws-api-gate-core/tests/proptest_parser.rs
// ============================================================================
// Module: Parser Property-Based Tests
// Description: Property tests for command parsing and translation.
// Purpose: Detect panics and nondeterminism across arbitrary command text.
// ============================================================================

//! Property-based tests for parser and translation invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use aws_api_gate_core::StaticCatalog;
use aws_api_gate_core::parse_command;
use aws_api_gate_core::resolve_region;
use aws_api_gate_core::translate_cli_to_ir;
use aws_api_gate_core::validate;
use proptest::prelude::*;

fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9-]{1,12}",
        "--[a-z-]{1,12}",
        "--[a-z-]{1,8}=[a-z0-9,]{0,8}",
        Just("--region".to_string()),
        Just("eu-west-2".to_string()),
        Just("arn:aws:s3:us-west-1:1:thing".to_string()),
        Just("Name=a,Values=b".to_string()),
    ]
}

fn command_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("sts"), Just("ec2"), Just("s3"), Just("s3api"), Just("cloud9"), Just("zzz")],
        prop_oneof![
            Just("get-caller-identity"),
            Just("describe-instances"),
            Just("ls"),
            Just("list-buckets"),
            Just("create-environment-ec2"),
            Just("nope"),
        ],
        prop::collection::vec(word_strategy(), 0 .. 8),
    )
        .prop_map(|(service, operation, words)| {
            format!("aws {service} {operation} {}", words.join(" "))
        })
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(text in ".{0,256}") {
        let _ = parse_command(&text);
    }

    #[test]
    fn parsing_is_deterministic(text in command_strategy()) {
        prop_assert_eq!(parse_command(&text), parse_command(&text));
    }

    #[test]
    fn translation_and_validation_are_deterministic(text in command_strategy()) {
        let catalog = StaticCatalog::builtin().unwrap();
        let first = translate_cli_to_ir(&catalog, &text);
        let second = translate_cli_to_ir(&catalog, &text);
        prop_assert_eq!(&first, &second);
        if let Ok(ir) = first {
            prop_assert_eq!(validate(&ir), validate(&ir));
            let region = resolve_region(&ir, "us-east-1");
            prop_assert!(!region.is_empty());
        }
    }
}
