//! API Tests: JSON prediction responses

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use crate::api::test_helpers::{
    body_string, create_grocery_app, create_overflow_app, create_sex_app,
    create_uninitialized_app, predict_request,
};
use crate::api::{ErrorResponse, PredictResponse};

async fn predict_json(app: axum::Router, body: &str) -> (StatusCode, String) {
    let response = app.oneshot(predict_request(body, true)).await.expect("oneshot");
    let status = response.status();
    (status, body_string(response).await)
}

#[tokio::test]
async fn test_sex_male_activates_column() {
    let (status, body) = predict_json(create_sex_app(), "Sex=male").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 1.0);
}

#[tokio::test]
async fn test_baseline_and_unknown_checkbox() {
    // female is the baseline; "a" resolves to column "A" by normalization
    let (status, body) = predict_json(create_sex_app(), "Sex=female&a=on").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 1.0);
}

#[tokio::test]
async fn test_empty_form_predicts_intercept() {
    let (status, body) = predict_json(create_sex_app(), "").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 0.0);
}

#[tokio::test]
async fn test_grocery_bill_rounded() {
    let (status, body) =
        predict_json(create_grocery_app(None, None), "Monthly_Grocery_Bill=150.499").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 150.5);
}

#[tokio::test]
async fn test_unparseable_number_is_zero() {
    let (status, body) =
        predict_json(create_grocery_app(None, None), "Monthly_Grocery_Bill=lots").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 0.0);
}

#[tokio::test]
async fn test_unit_divisor_applied() {
    let (status, body) =
        predict_json(create_grocery_app(Some(1000.0), None), "Monthly_Grocery_Bill=2500").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_str(&body).expect("json");
    assert_eq!(result.result, 2.5);
}

#[tokio::test]
async fn test_uninitialized_returns_503_every_time() {
    let app = create_uninitialized_app();
    for _ in 0..3 {
        let (status, body) = predict_json(app.clone(), "Sex=male").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let err: ErrorResponse = serde_json::from_str(&body).expect("json");
        assert!(err.error.starts_with("Prediction service unavailable"));
    }
}

#[tokio::test]
async fn test_pipeline_failure_returns_500() {
    let (status, body) = predict_json(create_overflow_app(), "Monthly_Grocery_Bill=1e308").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = serde_json::from_str(&body).expect("json");
    assert!(err.error.starts_with("Prediction failed:"));
}

#[tokio::test]
async fn test_accept_json_without_ajax_header() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("accept", "application/json")
        .body(Body::from("Sex=male"))
        .expect("request");
    let response = create_sex_app().oneshot(request).await.expect("oneshot");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let result: PredictResponse =
        serde_json::from_str(&body_string(response).await).expect("json");
    assert_eq!(result.result, 1.0);
}

#[tokio::test]
async fn test_non_form_body_returns_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::from(r#"{"Sex":"male"}"#))
        .expect("request");
    let response = create_sex_app().oneshot(request).await.expect("oneshot");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let err: ErrorResponse = serde_json::from_str(&body_string(response).await).expect("json");
    assert!(err.error.starts_with("Invalid form submission:"));
}
