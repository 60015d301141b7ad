use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::moderator_controller::ModeratorController;
use crate::dto::user_dto::{CreateModeratorRequest, DeleteModeratorResponse, ModeratorResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_moderator_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_moderators).post(create_moderator))
        .route("/:id", delete(delete_moderator))
}

async fn create_moderator(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<CreateModeratorRequest>,
) -> Result<(StatusCode, Json<ModeratorResponse>), AppError> {
    let controller = ModeratorController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_moderators(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<ModeratorResponse>>, AppError> {
    let controller = ModeratorController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn delete_moderator(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteModeratorResponse>, AppError> {
    let controller = ModeratorController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
