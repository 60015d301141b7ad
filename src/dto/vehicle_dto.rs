//! DTOs de vehículos
//!
//! Todas las formas que viajan por la API de vehículos: el formulario
//! multipart de alta/edición, los parámetros de listado y las responses.

use serde::{Deserialize, Serialize};

use crate::models::vehicle::Vehicle;

/// Archivo recibido en un formulario multipart
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Campos del formulario multipart de alta y edición de vehículos.
///
/// Todos opcionales: el alta valida los obligatorios más adelante y la
/// edición acepta cualquier subconjunto.
#[derive(Debug, Default)]
pub struct VehicleForm {
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub permitted_route: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub owner_image: Option<UploadedFile>,
}

/// Parámetros de listado y búsqueda
#[derive(Debug, Deserialize)]
pub struct ListVehiclesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: String,
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub vehicle_number: String,
    pub permitted_route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            owner_name: vehicle.owner_name,
            phone_number: vehicle.phone_number,
            address: vehicle.address,
            vehicle_number: vehicle.vehicle_number,
            permitted_route: vehicle.permitted_route,
            owner_image: vehicle.owner_image,
            vehicle_type: vehicle.vehicle_type,
            organization: vehicle.organization,
            status: vehicle.status.as_str().to_string(),
            qr_code: vehicle.lookup_token,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}

/// Metadatos de paginación que acompañan a cada listado
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Response de listado paginado
#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<VehicleResponse>,
    pub pagination: PaginationMeta,
}

/// Request para cambiar el estado de uno o todos los vehículos
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Response tras cambiar el estado de un vehículo
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub vehicle: VehicleResponse,
}

/// Response tras cambiar el estado de todos los vehículos
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAllStatusResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: u64,
    pub matched_count: i64,
    pub total_vehicles: i64,
}

/// Response de la normalización de estados faltantes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillStatusResponse {
    pub message: String,
    pub updated_count: u64,
    pub matched_count: i64,
}

/// Response tras eliminar un vehículo
#[derive(Debug, Serialize)]
pub struct DeleteVehicleResponse {
    pub message: String,
}

/// Candidato leído de una fila del Excel. Conserva lo que traía la fila
/// aunque la inserción haya fallado, para que el reporte muestre todo.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub permitted_route: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
}

/// Response del importador masivo
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
    pub records: Vec<ImportRecord>,
}
