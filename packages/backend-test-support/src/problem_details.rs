//! Assertions for RFC 7807 error responses.
//!
//! Kept independent of backend types so the contract is checked from the
//! outside, the way a client sees it.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Wire shape of a problem response.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Check status, content type, code, trace id parity and optionally a detail
/// substring. Returns the parsed body for further checks.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status, "unexpected status");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "content-type was {content_type:?}"
    );

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body).expect("body should be problem details JSON");

    let trace_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id should be ASCII");
    assert_eq!(problem.trace_id, trace_header, "trace id in body and header differ");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(expected_code),
        "type {:?} should end with the code",
        problem.type_
    );

    if let Some(fragment) = expected_detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "expected detail to contain {fragment:?}, got {:?}",
            problem.detail
        );
    }
    problem
}

pub async fn assert_problem_details_from_service_response(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    )
}
