use axum::{extract::State, http::StatusCode, Json};

use configs::PublicConfig;

use crate::errors::ApiError;
use crate::routes::AppState;

/// Browser-safe configuration. The service-role key has no field here.
#[utoipa::path(
    get,
    path = "/api/config/public",
    tag = "config",
    responses(
        (status = 200, description = "Public configuration", body = configs::PublicConfig),
        (status = 500, description = "Public configuration not loaded"),
    )
)]
pub async fn public_config(State(state): State<AppState>) -> Result<Json<PublicConfig>, ApiError> {
    state
        .public_config
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "public configuration is not loaded"))
}
