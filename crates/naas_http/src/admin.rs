//! Runtime-control endpoints
//!
//! Optional axum router exposing the engine's runtime controls over HTTP.
//! Hosts mount it wherever their operational surface lives; the decision
//! path does not depend on it.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use thiserror::Error;

use naas_core::{ChaosEngine, ConfigError, ConfigUpdate, EngineStats};

/// Build the admin router for an engine
///
/// Routes: `GET /chaos/stats`, `PUT /chaos/config`, `POST /chaos/enable`,
/// `POST /chaos/disable`.
#[must_use]
pub fn admin_router(engine: Arc<ChaosEngine>) -> Router {
    Router::new()
        .route("/chaos/stats", get(stats))
        .route("/chaos/config", put(update_config))
        .route("/chaos/enable", post(enable))
        .route("/chaos/disable", post(disable))
        .with_state(engine)
}

/// Rejected configuration change
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AdminError(#[from] ConfigError);

#[derive(Debug, Serialize)]
struct AdminErrorBody {
    error: String,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(AdminErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn stats(State(engine): State<Arc<ChaosEngine>>) -> Json<EngineStats> {
    Json(engine.stats())
}

async fn update_config(
    State(engine): State<Arc<ChaosEngine>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<EngineStats>, AdminError> {
    engine.update_config(update)?;
    Ok(Json(engine.stats()))
}

async fn enable(State(engine): State<Arc<ChaosEngine>>) -> Json<EngineStats> {
    engine.enable();
    Json(engine.stats())
}

async fn disable(State(engine): State<Arc<ChaosEngine>>) -> Json<EngineStats> {
    engine.disable();
    Json(engine.stats())
}
