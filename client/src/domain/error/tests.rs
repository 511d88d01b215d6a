//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn field_error() -> DomainError {
    DomainError::invalid_request("Please fix the highlighted fields")
        .with_details(json!({"email": "Please enter a valid email address"}))
}

#[rstest]
#[case(DomainError::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(DomainError::unauthorized("login"), ErrorCode::Unauthorized)]
#[case(DomainError::not_found("gone"), ErrorCode::NotFound)]
#[case(DomainError::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(DomainError::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: DomainError, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = DomainError::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(DomainErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_fallback_for_blank_messages() {
    let error = DomainError::new(ErrorCode::ServiceUnavailable, "");
    assert_eq!(error.message(), "data service unavailable");
}

#[rstest]
fn display_is_the_raw_message() {
    let error = DomainError::internal("duplicate key value violates unique constraint");
    assert_eq!(
        error.to_string(),
        "duplicate key value violates unique constraint"
    );
}

#[rstest]
fn serialises_with_details(field_error: DomainError) {
    let value = serde_json::to_value(&field_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "Please fix the highlighted fields",
            "details": {"email": "Please enter a valid email address"},
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let payload = json!({"code": "not_found", "message": "  "});
    let result = serde_json::from_value::<DomainError>(payload);
    assert!(result.is_err());
}
