//! Integration tests for Error types
//!
//! Tests error construction, codes, recoverability, display and context.

use scopedsl_foundation::{EntityId, Error, ErrorCode, ErrorContext, ErrorKind};

// =============================================================================
// Codes
// =============================================================================

#[test]
fn stable_codes() {
    let cases = [
        (Error::missing_context("actor"), "SCOPE_1001"),
        (Error::malformed_ast("empty field"), "SCOPE_1002"),
        (Error::scope_not_found("core:x"), "SCOPE_1003"),
        (Error::cycle_detected(vec!["a:a".into(), "a:a".into()]), "SCOPE_1004"),
        (Error::depth_exceeded(50, 50, vec![]), "SCOPE_1005"),
        (Error::invalid_filter_pattern("(", "unclosed group"), "SCOPE_2001"),
        (Error::condition_not_found("core:gone"), "SCOPE_2002"),
        (
            Error::coverage_metadata(EntityId::new("hat"), "bad tier"),
            "SCOPE_3001",
        ),
    ];
    for (error, code) in cases {
        assert_eq!(error.code().as_str(), code, "{error}");
    }
}

#[test]
fn recoverability() {
    assert!(!Error::missing_context("actor").is_recoverable());
    assert!(!Error::cycle_detected(vec![]).is_recoverable());
    assert!(!Error::depth_exceeded(1, 1, vec![]).is_recoverable());
    assert!(Error::invalid_filter_pattern("(", "x").is_recoverable());
    assert!(Error::condition_not_found("c").is_recoverable());
    assert!(Error::coverage_metadata(EntityId::new("a"), "x").is_recoverable());
    assert!(!ErrorCode::Parse.is_recoverable());
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn cycle_display_shows_chain() {
    let err = Error::cycle_detected(vec!["core:a".into(), "core:b".into(), "core:a".into()]);
    assert_eq!(
        err.to_string(),
        "scope reference cycle: core:a -> core:b -> core:a"
    );
    assert!(matches!(err.kind, ErrorKind::CycleDetected { ref chain } if chain.len() == 3));
}

#[test]
fn depth_display() {
    let err = Error::depth_exceeded(51, 50, vec!["core:a".into()]);
    assert_eq!(err.to_string(), "resolution depth 51 exceeds limit 50");
}

#[test]
fn code_display() {
    assert_eq!(ErrorCode::CoverageMetadataError.to_string(), "SCOPE_3001");
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_component("coverage")
        .with_entity(EntityId::new("hat"))
        .with_slot("head", "accessories")
        .with_scope_chain(vec!["core:a".into(), "core:b".into()]);
    assert_eq!(
        context.to_string(),
        "in coverage, entity hat, slot head/accessories, via core:a -> core:b"
    );
    assert_eq!(ErrorContext::new().to_string(), "");
}

#[test]
fn context_attaches_without_changing_message() {
    let err = Error::scope_not_found("core:x")
        .with_context(ErrorContext::new().with_component("reference"));
    assert_eq!(err.to_string(), "scope not found: core:x");
    assert_eq!(
        err.context.and_then(|c| c.component).as_deref(),
        Some("reference")
    );
}
