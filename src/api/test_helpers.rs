//! Test helper functions for api tests
//!
//! Builds routers over small in-memory artifact sets so endpoint tests do
//! not depend on files on disk.

use axum::{body::Body, http::Request, Router};

use super::*;
use crate::{
    artifacts::{ArtifactPaths, Artifacts},
    model::RegressionModel,
    reconcile::ReconcileRules,
    scaler::FeatureScaler,
    schema::FeatureSchema,
    scorer::UnitConversion,
};

fn artifacts(columns: &[&str], coefficients: Vec<f64>, intercept: f64) -> Artifacts {
    let schema =
        FeatureSchema::new(columns.iter().map(ToString::to_string).collect()).expect("schema");
    Artifacts::new(
        schema,
        FeatureScaler::Identity,
        RegressionModel::Linear {
            coefficients,
            intercept,
        },
    )
    .expect("artifacts")
}

fn app(service: ServiceState, unit_label: Option<&str>) -> Router {
    let state = AppState::new(service, unit_label.map(ToString::to_string)).expect("state");
    create_router(state)
}

/// Three columns, unit weights: predicts the number of active features
pub fn create_sex_app() -> Router {
    let service = ServiceState::ready(
        artifacts(&["A", "B", "Sex_male"], vec![1.0, 1.0, 1.0], 0.0),
        ReconcileRules::survey(),
        None,
    );
    app(service, None)
}

/// `["Monthly Grocery Bill", "Sex_male"]` with weights `[1, 0]`
pub fn create_grocery_app(conversion: Option<f64>, unit_label: Option<&str>) -> Router {
    let conversion = conversion.map(|d| UnitConversion::new(d).expect("divisor"));
    let service = ServiceState::ready(
        artifacts(&["Monthly Grocery Bill", "Sex_male"], vec![1.0, 0.0], 0.0),
        ReconcileRules::survey(),
        conversion,
    );
    app(service, unit_label)
}

/// Large grocery weight so an extreme bill overflows to infinity
pub fn create_overflow_app() -> Router {
    let service = ServiceState::ready(
        artifacts(&["Monthly Grocery Bill"], vec![1e308], 0.0),
        ReconcileRules::survey(),
        None,
    );
    app(service, None)
}

/// Service whose artifacts could not be loaded
pub fn create_uninitialized_app() -> Router {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = ServiceState::load(
        &ArtifactPaths::in_dir(dir.path()),
        ReconcileRules::survey(),
        None,
    );
    assert!(!service.is_ready());
    app(service, None)
}

/// URL-encoded `POST /predict`, optionally flagged as an AJAX call
pub fn predict_request(body: &str, ajax: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/x-www-form-urlencoded");
    if ajax {
        builder = builder.header("X-Requested-With", "XMLHttpRequest");
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// Collect a response body as a UTF-8 string
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}
