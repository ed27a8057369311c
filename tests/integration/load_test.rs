// Load-test endpoint: aggregation, defaults, and call counts.
use super::test_utils::TestServer;
use axum::body::to_bytes;
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_BODY_LIMIT: usize = 1024 * 1024;

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), TEST_BODY_LIMIT)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response is not valid JSON")
}

#[tokio::test]
async fn summary_aggregates_mixed_backend_outcomes() {
    let backend = MockServer::start().await;
    // Three successes, then failures for the remaining calls.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(3)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let server = TestServer::new(&backend.uri());
    let response = server
        .call(TestServer::make_request(
            "GET",
            "/api/load-test?requests=5",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({
            "total": 5,
            "successful": 3,
            "failed": 2,
            "successRate": "60.00%"
        })
    );

    let received = backend
        .received_requests()
        .await
        .expect("requests recorded");
    assert_eq!(received.len(), 5, "exactly the requested number of calls");
}

#[tokio::test]
async fn invalid_requests_parameter_defaults_to_ten() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(10)
        .mount(&backend)
        .await;

    let server = TestServer::new(&backend.uri());
    let response = server
        .call(TestServer::make_request(
            "GET",
            "/api/load-test?requests=abc",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["total"], 10);
    assert_eq!(json["successful"], 10);
    assert_eq!(json["successRate"], "100.00%");
}

#[tokio::test]
async fn zero_requests_parameter_defaults_instead_of_dividing_by_zero() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(10)
        .mount(&backend)
        .await;

    let server = TestServer::new(&backend.uri());
    let response = server
        .call(TestServer::make_request(
            "GET",
            "/api/load-test?requests=0",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["total"], 10);
}

#[tokio::test]
async fn all_failures_still_complete_the_run() {
    let server = TestServer::with_unreachable_backend();

    let response = server
        .call(TestServer::make_request(
            "GET",
            "/api/load-test?requests=3",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({
            "total": 3,
            "successful": 0,
            "failed": 3,
            "successRate": "0.00%"
        })
    );
}
