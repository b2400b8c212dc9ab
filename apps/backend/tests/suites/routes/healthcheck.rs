use actix_web::test;
use serde_json::Value;
use tictactoe_backend::AppError;

use crate::support::app_builder::create_test_app;
use crate::support::test_state::{build_memory_state, build_test_state};

#[actix_web::test]
async fn health_reports_database_and_migration() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["migrations"], "m20251016_000001_init");
    assert!(body.get("db_error").is_none());
    Ok(())
}

#[actix_web::test]
async fn health_without_database() -> Result<(), AppError> {
    let app = create_test_app(build_memory_state().await?).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;
    assert_eq!(body["db"], "in_memory");
    Ok(())
}
