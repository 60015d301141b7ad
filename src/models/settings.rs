//! Modelo de Settings
//!
//! Configuración operativa del registro. Hoy solo gobierna el modo
//! mantenimiento; cada fila está protegida por un secreto propio.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Configuración operativa - mapea a la tabla `settings`
#[derive(Debug, Clone, FromRow)]
pub struct Settings {
    pub id: Uuid,
    pub secret: String,
    pub is_maintenance: bool,
    pub maintenance_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para crear una configuración nueva
#[derive(Debug, Clone)]
pub struct NewSettings {
    pub secret: String,
    pub is_maintenance: bool,
    pub maintenance_message: Option<String>,
}
