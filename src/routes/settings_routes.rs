use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::settings_dto::{
    CreateSettingsRequest, MaintenanceStatusResponse, SettingsResponse, UpdateSettingsRequest,
    UpdateSettingsResponse,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de configuración. No llevan JWT: el update se autentica con el
/// secreto de la propia fila y el resto lo consume el frontend público.
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/maintenance-status", get(maintenance_status))
        .route("/create", post(add_settings))
        .route("/update/:secret", put(update_settings))
}

async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<SettingsResponse>>, AppError> {
    let controller = SettingsController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

/// `null` cuando todavía no existe configuración
async fn maintenance_status(
    State(state): State<AppState>,
) -> Result<Json<Option<MaintenanceStatusResponse>>, AppError> {
    let controller = SettingsController::new(&state);
    let response = controller.maintenance_status().await?;
    Ok(Json(response))
}

async fn add_settings(
    State(state): State<AppState>,
    Json(request): Json<CreateSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, AppError> {
    let controller = SettingsController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_settings(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>, AppError> {
    let controller = SettingsController::new(&state);
    let response = controller.update(&secret, request).await?;
    Ok(Json(response))
}
