use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::{PermitCard, VehicleController};
use crate::dto::vehicle_dto::{
    BackfillStatusResponse, DeleteVehicleResponse, ImportResponse, ListVehiclesQuery,
    SetAllStatusResponse, StatusUpdateResponse, UpdateStatusRequest, UploadedFile, VehicleForm,
    VehicleListResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_vehicle))
        .route("/getAll", get(get_all_vehicles))
        .route("/upload/excel", post(upload_excel))
        .route("/update-status", post(backfill_statuses))
        .route("/status/all", patch(update_all_statuses))
        .route(
            "/:id",
            get(get_vehicle_card)
                .put(update_vehicle)
                .delete(delete_vehicle),
        )
        .route("/:id/details", get(get_vehicle_details))
        .route("/:id/status", patch(update_vehicle_status))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", e))
}

/// Lee el formulario multipart de alta/edición. Los campos de texto
/// vacíos cuentan como no enviados, igual que un archivo de cero bytes.
async fn parse_vehicle_form(mut multipart: Multipart) -> Result<VehicleForm, AppError> {
    let mut form = VehicleForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "ownerImage" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !bytes.is_empty() {
                form.owner_image = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field.text().await.map_err(multipart_error)?;
        let value = match text.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };

        match name.as_str() {
            "ownerName" => form.owner_name = value,
            "phoneNumber" => form.phone_number = value,
            "address" => form.address = value,
            "vehicleNumber" => form.vehicle_number = value,
            "permittedRoute" => form.permitted_route = value,
            // El frontend histórico manda vehicle_type en snake_case
            "vehicleType" | "vehicle_type" => form.vehicle_type = value,
            "organization" => form.organization = value,
            _ => {}
        }
    }

    Ok(form)
}

async fn add_vehicle(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    let form = parse_vehicle_form(multipart).await?;
    let controller = VehicleController::new(&state);
    let vehicle = controller.create(form).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn get_all_vehicles(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListVehiclesQuery>,
) -> Result<Json<VehicleListResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

/// Página pública de la tarjeta. Un id malformado se trata como
/// inexistente: quien escanea un código dañado ve la misma página 404.
async fn get_vehicle_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let controller = VehicleController::new(&state);

    let card = match Uuid::parse_str(&id) {
        Ok(uuid) => controller.card(uuid).await?,
        Err(_) => PermitCard::NotFound,
    };

    let response = match card {
        PermitCard::Active(html) | PermitCard::Blocked(html) => (StatusCode::OK, Html(html)),
        PermitCard::NotFound => (
            StatusCode::NOT_FOUND,
            Html("<h2>Vehicle not found</h2>".to_string()),
        ),
    };

    Ok(response)
}

async fn get_vehicle_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.details(id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<VehicleResponse>, AppError> {
    let form = parse_vehicle_form(multipart).await?;
    let controller = VehicleController::new(&state);
    let vehicle = controller.update(id, form).await?;
    Ok(Json(vehicle))
}

async fn update_vehicle_status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.set_status(id, request).await?;
    Ok(Json(response))
}

async fn update_all_statuses(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<SetAllStatusResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.set_all_status(request).await?;
    Ok(Json(response))
}

async fn backfill_statuses(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<BackfillStatusResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.backfill_status().await?;
    Ok(Json(response))
}

async fn upload_excel(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(multipart_error)?;
            file = Some(bytes.to_vec());
        }
    }

    let Some(bytes) = file else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    let controller = VehicleController::new(&state);
    let response = controller.import(&bytes).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteVehicleResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
