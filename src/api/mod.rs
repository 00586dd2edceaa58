//! HTTP API for carbon-footprint prediction
//!
//! ## Endpoints
//!
//! - `GET /` - Survey form page
//! - `POST /predict` - Predict from a URL-encoded survey form
//! - `GET /health` - Health and readiness check
//!
//! `POST /predict` answers with JSON (`{"result": ..}` / `{"error": ..}`) when
//! the request carries `X-Requested-With: XMLHttpRequest` or prefers
//! `application/json`; otherwise it renders the form page with the result or
//! error embedded.
//!
//! ## Example
//!
//! ```rust,ignore
//! use huella::api::{create_router, AppState};
//!
//! let state = AppState::new(service, None)?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

mod page;
mod predict_handlers;
mod types;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

pub use page::PageRenderer;
pub use types::{ErrorResponse, HealthResponse, PredictResponse};

use crate::{error::Result, service::ServiceState};
use predict_handlers::predict_handler;

/// Application state shared across handlers
///
/// Both parts are immutable after startup; cloning only bumps reference counts.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Prediction state decided at startup
    service: Arc<ServiceState>,
    /// Form page renderer
    page: Arc<PageRenderer>,
}

impl AppState {
    /// Create application state
    ///
    /// # Arguments
    ///
    /// * `service` - Loaded (or failed) prediction service
    /// * `unit_label` - Unit shown next to results on the form page
    ///
    /// # Errors
    ///
    /// Returns error if the page template fails to compile
    pub fn new(service: ServiceState, unit_label: Option<String>) -> Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            page: Arc::new(PageRenderer::new(unit_label)?),
        })
    }

    /// Prediction service
    #[must_use]
    pub fn service(&self) -> &ServiceState {
        &self.service
    }

    /// Render the form page, degrading to a plain 500 if the template fails
    pub(crate) fn render_page(&self, result: Option<f64>, error: Option<&str>) -> Response {
        match self.page.render(result, error) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "page render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            },
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Form page handler
async fn index_handler(State(state): State<AppState>) -> Response {
    state.render_page(None, None)
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state.service.is_ready();
    Json(HealthResponse {
        status: if ready { "healthy" } else { "degraded" }.to_string(),
        version: crate::VERSION.to_string(),
        ready,
        features: state.service.feature_count(),
    })
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod tests;
