#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use backend_test_support::problem_details::{
    assert_problem_details_from_service_response, ProblemDetailsLike,
};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Problem-details assertion with the backend's type URL prefix checked too.
pub async fn assert_problem<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ProblemDetailsLike {
    let problem =
        assert_problem_details_from_service_response(resp, expected_code, expected_status, None)
            .await;
    assert!(
        problem.type_.starts_with("https://blue-auth.dev/errors/"),
        "type should follow the expected URL format, got {}",
        problem.type_
    );
    problem
}
