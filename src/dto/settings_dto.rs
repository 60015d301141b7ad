//! DTOs de configuración operativa

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::settings::Settings;

/// Request para crear una configuración
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSettingsRequest {
    #[validate(length(min = 1))]
    pub secret: String,

    pub is_maintenance: Option<bool>,

    pub maintenance_message: Option<String>,
}

/// Request para cambiar el modo mantenimiento
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub is_maintenance: bool,
}

/// Response de configuración. El secreto nunca sale por la API.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub id: String,
    pub is_maintenance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            id: settings.id.to_string(),
            is_maintenance: settings.is_maintenance,
            maintenance_message: settings.maintenance_message,
            created_at: settings.created_at.to_rfc3339(),
            updated_at: settings.updated_at.to_rfc3339(),
        }
    }
}

/// Estado del modo mantenimiento para el frontend
#[derive(Debug, Serialize)]
pub struct MaintenanceStatusResponse {
    pub is_maintenance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_message: Option<String>,
}

/// Response tras actualizar el modo mantenimiento
#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub message: String,
    pub data: SettingsResponse,
}
