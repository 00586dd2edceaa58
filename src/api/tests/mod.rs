//! API Tests
//!
//! Part organization:
//! - predict_json: `POST /predict` for AJAX and `Accept: application/json` callers
//! - predict_page: `POST /predict` form posts and `GET /`
//! - health: `GET /health` in ready and degraded states

mod predict_json;
