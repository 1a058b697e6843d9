//! HTTP endpoint integration tests using axum-test

use agreement_server::{app, render_to_file, AppState};
use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;

const SVG_LOGO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#;

/// Create a test server with the full router
fn create_test_server() -> TestServer {
    TestServer::new(app(AppState::default())).unwrap()
}

#[tokio::test]
async fn test_health_returns_200() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "front-pdfs");
}

#[tokio::test]
async fn test_form_page() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains(r#"action="/api/speakers-agreement.pdf""#));
    assert!(html.contains(r#"name="compensation""#));
    assert!(html.contains(r#"data-relation="workshopOnly""#));
}

#[tokio::test]
async fn test_agreement_pdf() {
    let server = create_test_server();

    for path in ["/speakers-agreement.pdf", "/api/speakers-agreement.pdf"] {
        let response = server
            .get(path)
            .add_query_param("duration", "30")
            .add_query_param("compensation", "1000")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        assert_eq!(
            response.header("content-disposition"),
            "inline; filename=\"speakers-agreement.pdf\""
        );

        let bytes = response.as_bytes();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(lopdf::Document::load_mem(bytes).is_ok());
    }
}

#[tokio::test]
async fn test_identical_queries_give_identical_pdfs() {
    let server = create_test_server();
    let url = "/api/speakers-agreement.pdf?duration=45&compensation=1500&workshop=true\
               &workshopHalfDay=true&workshopDate=26%20August%202020&origin=Overseas";

    let first = server.get(url).await;
    let second = server.get(url).await;
    first.assert_status_ok();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[tokio::test]
async fn test_missing_parameters_return_400() {
    let server = create_test_server();
    let response = server
        .get("/api/speakers-agreement.pdf")
        .add_query_param("duration", "30")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("compensation"));
}

#[tokio::test]
async fn test_unknown_origin_returns_400() {
    let server = create_test_server();
    let response = server
        .get("/api/speakers-agreement.pdf?duration=30&compensation=1000&origin=Mars")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = create_test_server();
    let response = server.get("/nope").expect_failure().await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No route for '/nope'");
}

#[tokio::test]
async fn test_custom_logo_is_used() {
    let default = create_test_server();
    let custom = TestServer::new(app(AppState::new(SVG_LOGO))).unwrap();
    let url = "/api/speakers-agreement.pdf?duration=30&compensation=1000";

    let a = default.get(url).await;
    let b = custom.get(url).await;
    b.assert_status_ok();
    assert!(a.as_bytes() != b.as_bytes());
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("agreement.pdf");

    let pages = render_to_file(
        &AppState::default(),
        Some(r#"{"duration": 30, "compensation": 1000, "origin": "Zurich"}"#),
        &out,
    )
    .unwrap();

    assert!(pages >= 1);
    let loaded = lopdf::Document::load(&out).unwrap();
    assert_eq!(loaded.get_pages().len(), pages);
}

#[test]
fn test_render_to_file_rejects_incomplete_config() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("agreement.pdf");

    assert!(render_to_file(&AppState::default(), None, &out).is_err());
    assert!(!out.exists());
}
