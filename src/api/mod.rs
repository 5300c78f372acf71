mod error;

pub use error::ApiError;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    dashboard::{Dashboard, SearchOutcome},
    models::{CityCoordinate, GeoPoint, TripQuery},
    projection::{ProjectionParams, compute_projection_params},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchParams {
    pub from: String,
    pub to: String,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default)]
    pub round_trip: bool,
}

fn default_passengers() -> u32 {
    1
}

impl From<SearchParams> for TripQuery {
    fn from(params: SearchParams) -> Self {
        TripQuery::new(params.from, params.to)
            .with_passengers(params.passengers)
            .with_round_trip(params.round_trip)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub points: Vec<GeoPoint>,
}

pub fn router(dashboard: Dashboard) -> Router {
    Router::new()
        .route("/cities", get(get_cities))
        .route("/search", get(search))
        .route("/projection", post(post_projection))
        .with_state(dashboard)
}

async fn get_cities(State(dashboard): State<Dashboard>) -> Json<Vec<CityCoordinate>> {
    Json(dashboard.data().cities().to_vec())
}

#[instrument(skip(dashboard))]
async fn search(
    State(dashboard): State<Dashboard>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = TripQuery::from(params);
    // Route geometry is read from disk
    let outcome = tokio::task::spawn_blocking(move || dashboard.search(&query)).await??;

    let status = match outcome {
        SearchOutcome::Found(_) => StatusCode::OK,
        SearchOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    Ok((status, Json(outcome)).into_response())
}

async fn post_projection(
    State(dashboard): State<Dashboard>,
    Json(request): Json<ProjectionRequest>,
) -> Result<Json<ProjectionParams>, ApiError> {
    let params = compute_projection_params(&request.points, dashboard.projection_settings())?;
    Ok(Json(params))
}
