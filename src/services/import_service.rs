//! Importador masivo desde Excel
//!
//! Lee la primera hoja de un workbook .xlsx, mapea las columnas por nombre
//! de encabezado y registra cada fila a través del mismo camino que el
//! alta manual. Las filas se procesan en lotes secuenciales y cada fila
//! fallida se omite sin frenar el resto.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::{info, warn};
use validator::ValidationErrors;

use crate::dto::vehicle_dto::ImportRecord;
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::services::registry_service::RegistryService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::require_non_empty;

/// Filas por lote del importador
pub const BATCH_SIZE: usize = 1000;

/// Resultado agregado de una importación
#[derive(Debug)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
    /// Todas las filas leídas, incluidas las omitidas
    pub records: Vec<ImportRecord>,
}

pub struct ImportService {
    registry: RegistryService,
}

impl ImportService {
    pub fn new(registry: RegistryService) -> Self {
        Self { registry }
    }

    /// Importa todas las filas del workbook. Un archivo ilegible corta la
    /// operación entera; una fila inválida solo se omite.
    pub async fn import(&self, bytes: &[u8]) -> AppResult<ImportReport> {
        let records = parse_workbook(bytes)?;
        let total = records.len();
        let mut imported = 0usize;

        for (batch_index, batch) in records.chunks(BATCH_SIZE).enumerate() {
            for (offset, record) in batch.iter().enumerate() {
                // +2: las filas del archivo son 1-based y la primera es el encabezado
                let row_number = batch_index * BATCH_SIZE + offset + 2;
                match self.commit_row(record).await {
                    Ok(_) => imported += 1,
                    Err(e) => warn!("⚠️ Fila {} omitida: {}", row_number, e),
                }
            }
            info!("📦 Lote {} procesado ({} filas)", batch_index + 1, batch.len());
        }

        info!(
            "✅ Importación terminada: {} de {} filas registradas",
            imported, total
        );

        Ok(ImportReport {
            imported,
            skipped: total - imported,
            total,
            records,
        })
    }

    async fn commit_row(&self, record: &ImportRecord) -> AppResult<Vehicle> {
        let new = to_new_vehicle(record)?;
        self.registry.insert_with_token(new).await
    }
}

/// Columnas que el importador reconoce en el encabezado
#[derive(Debug, Clone, Copy)]
enum Column {
    OwnerName,
    PhoneNumber,
    Address,
    VehicleNumber,
    PermittedRoute,
    VehicleType,
    Organization,
}

impl Column {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ownername" => Some(Column::OwnerName),
            "phonenumber" => Some(Column::PhoneNumber),
            "address" => Some(Column::Address),
            "vehiclenumber" => Some(Column::VehicleNumber),
            "permittedroute" => Some(Column::PermittedRoute),
            "vehicletype" => Some(Column::VehicleType),
            "organization" => Some(Column::Organization),
            _ => None,
        }
    }

    fn assign(&self, record: &mut ImportRecord, value: String) {
        match self {
            Column::OwnerName => record.owner_name = Some(value),
            Column::PhoneNumber => record.phone_number = Some(value),
            Column::Address => record.address = Some(value),
            Column::VehicleNumber => record.vehicle_number = Some(value),
            Column::PermittedRoute => record.permitted_route = Some(value),
            Column::VehicleType => record.vehicle_type = Some(value),
            Column::Organization => record.organization = Some(value),
        }
    }
}

/// Normaliza un encabezado para compararlo: minúsculas y sin separadores.
/// Así `ownerName`, `owner_name` y `Owner Name` mapean a la misma columna.
fn header_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '_', '-'], "")
}

/// Convierte una celda a texto. Los números enteros se formatean sin
/// decimales para que un teléfono leído como número no termine en `.0`.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            let value = *f;
            if (value - value.trunc()).abs() < f64::EPSILON {
                Some(format!("{}", value.trunc() as i64))
            } else {
                Some(value.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Lee el workbook completo a candidatos. Cualquier problema de formato
/// del archivo es fatal; aquí todavía no se toca el almacén.
fn parse_workbook(bytes: &[u8]) -> AppResult<Vec<ImportRecord>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = Xlsx::new(cursor)
        .map_err(|e| AppError::BadRequest(format!("Error processing Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            AppError::BadRequest("Error processing Excel file: no sheets found".to_string())
        })?
        .map_err(|e| AppError::BadRequest(format!("Error processing Excel file: {}", e)))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<Option<Column>> = header_row
        .iter()
        .map(|cell| {
            cell_to_string(cell)
                .map(|raw| header_key(&raw))
                .and_then(|key| Column::from_key(&key))
        })
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record = ImportRecord::default();
        let mut has_values = false;

        for (cell, column) in row.iter().zip(&columns) {
            let Some(column) = column else { continue };
            let Some(value) = cell_to_string(cell) else { continue };
            has_values = true;
            column.assign(&mut record, value);
        }

        // Las filas sin ninguna celda aprovechable no cuentan
        if has_values {
            records.push(record);
        }
    }

    Ok(records)
}

fn to_new_vehicle(record: &ImportRecord) -> AppResult<NewVehicle> {
    let mut errors = ValidationErrors::new();
    require_non_empty(
        &mut errors,
        "ownerName",
        record.owner_name.as_deref().unwrap_or(""),
    );
    require_non_empty(
        &mut errors,
        "phoneNumber",
        record.phone_number.as_deref().unwrap_or(""),
    );
    require_non_empty(&mut errors, "address", record.address.as_deref().unwrap_or(""));
    require_non_empty(
        &mut errors,
        "vehicleNumber",
        record.vehicle_number.as_deref().unwrap_or(""),
    );
    require_non_empty(
        &mut errors,
        "permittedRoute",
        record.permitted_route.as_deref().unwrap_or(""),
    );

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewVehicle {
        owner_name: record.owner_name.clone().unwrap_or_default(),
        phone_number: record.phone_number.clone().unwrap_or_default(),
        address: record.address.clone().unwrap_or_default(),
        vehicle_number: record.vehicle_number.clone().unwrap_or_default(),
        permitted_route: record.permitted_route.clone().unwrap_or_default(),
        owner_image: None,
        vehicle_type: record.vehicle_type.clone(),
        organization: record.organization.clone(),
    })
}
