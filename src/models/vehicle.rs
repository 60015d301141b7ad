//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle del registro de permisos y los
//! tipos de entrada hacia el almacén. Mapea a la tabla `vehicles` con
//! primary key 'id'.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del vehículo dentro del registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Active,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Inactive => "inactive",
        }
    }

    /// Parsea el valor recibido por la API. Solo se aceptan los dos
    /// estados conocidos.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "active" => Some(VehicleStatus::Active),
            "inactive" => Some(VehicleStatus::Inactive),
            _ => None,
        }
    }

    /// Interpreta el estado tal como vive en el almacén. Las filas
    /// históricas pueden traer NULL, cadena vacía o valores desconocidos;
    /// todas se leen como `Active` hasta que la normalización las reescriba.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("inactive") => VehicleStatus::Inactive,
            _ => VehicleStatus::Active,
        }
    }
}

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Active
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal del registro, ya normalizado para el dominio
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub vehicle_number: String,
    pub permitted_route: String,
    pub owner_image: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub status: VehicleStatus,
    pub lookup_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fila cruda tal como vive en la tabla `vehicles`.
///
/// El estado se conserva como texto opcional porque las filas importadas
/// de sistemas anteriores pueden venir sin él.
#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    pub id: Uuid,
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub vehicle_number: String,
    pub permitted_route: String,
    pub owner_image: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub status: Option<String>,
    pub lookup_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        let status = VehicleStatus::from_db(row.status.as_deref());
        Self {
            id: row.id,
            owner_name: row.owner_name,
            phone_number: row.phone_number,
            address: row.address,
            vehicle_number: row.vehicle_number,
            permitted_route: row.permitted_route,
            owner_image: row.owner_image,
            vehicle_type: row.vehicle_type,
            organization: row.organization,
            status,
            lookup_token: row.lookup_token,
            created_at: row.created_at,
        }
    }
}

/// Datos para insertar un vehículo nuevo en el almacén
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub vehicle_number: String,
    pub permitted_route: String,
    pub owner_image: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
}

/// Cambios parciales sobre un vehículo existente.
///
/// Los campos en `None` conservan el valor previo.
#[derive(Debug, Clone, Default)]
pub struct VehiclePatch {
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub permitted_route: Option<String>,
    pub owner_image: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub status: Option<VehicleStatus>,
    pub lookup_token: Option<String>,
}
