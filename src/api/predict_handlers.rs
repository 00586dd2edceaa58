//! Prediction handler
//!
//! Runs reconcile → score on a submitted survey form and formats the outcome
//! for either the AJAX client (JSON) or a plain form post (HTML page).

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use tracing::{error, info, warn};

use super::{AppState, ErrorResponse, PredictResponse};
use crate::{error::HuellaError, reconcile::FormInput};

/// Header the form page's script sets on AJAX submissions
const REQUESTED_WITH: &str = "x-requested-with";

/// Whether the caller wants a JSON reply instead of a rendered page
pub(crate) fn wants_json(headers: &HeaderMap) -> bool {
    let ajax = headers
        .get(REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    if ajax {
        return true;
    }

    // First listed media type wins; parameters like `;q=0.9` are ignored
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Map a prediction error to a status code and user-facing message
fn failure(err: &HuellaError) -> (StatusCode, String) {
    match err {
        HuellaError::Unavailable { .. } => {
            warn!(error = %err, "prediction requested while artifacts are unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        },
        _ => {
            if err.is_pipeline_error() {
                error!(error = %err, "prediction pipeline failed");
            } else {
                error!(error = %err, "unexpected prediction error");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prediction failed: {err}"),
            )
        },
    }
}

/// Error reply in the caller's format; page callers get the form back with the message
fn error_response(state: &AppState, json: bool, status: StatusCode, message: String) -> Response {
    if json {
        (status, Json(ErrorResponse { error: message })).into_response()
    } else {
        state.render_page(None, Some(&message))
    }
}

/// Prediction handler (`POST /predict`)
pub(crate) async fn predict_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let json = wants_json(&headers);
    let form = match body {
        Ok(Form(fields)) => FormInput::from(fields),
        Err(rejection) => {
            warn!(error = %rejection, "rejected prediction request body");
            let message = format!("Invalid form submission: {}", rejection.body_text());
            return error_response(&state, json, rejection.status(), message);
        },
    };

    match state.service().predict(&form) {
        Ok(prediction) => {
            let result = prediction.rounded();
            info!(result, raw = prediction.raw, fields = form.len(), "prediction served");
            if json {
                Json(PredictResponse { result }).into_response()
            } else {
                state.render_page(Some(result), None)
            }
        },
        Err(err) => {
            let (status, message) = failure(&err);
            error_response(&state, json, status, message)
        },
    }
}
