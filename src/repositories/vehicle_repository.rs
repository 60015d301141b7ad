//! Repositorio de vehículos
//!
//! El trait describe el contrato con el almacén; hay una implementación
//! sobre PostgreSQL y otra en memoria para pruebas y desarrollo.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, Vehicle, VehiclePatch, VehicleRow, VehicleStatus};
use crate::utils::errors::{AppError, AppResult};

/// Criterio de selección sobre el almacén de vehículos
#[derive(Debug, Clone)]
pub enum VehicleFilter {
    /// Todos los registros
    All,
    /// Coincidencia parcial en cualquier campo de texto, sin distinguir
    /// mayúsculas. El término se trata de forma literal.
    Search(String),
    /// Filas históricas sin estado registrado (NULL o cadena vacía)
    MissingStatus,
}

/// Resultado de una actualización masiva de estado
#[derive(Debug, Clone, Copy)]
pub struct BulkUpdateOutcome {
    /// Filas que cumplían el criterio
    pub matched: i64,
    /// Filas efectivamente reescritas
    pub modified: u64,
}

#[async_trait::async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Inserta un vehículo nuevo con estado `active` y sin token.
    /// Falla con `DuplicateVehicle` si el número de vehículo ya existe.
    async fn insert(&self, new: NewVehicle) -> AppResult<Vehicle>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    /// Página de resultados en orden estable de inserción (created_at, id)
    async fn find(&self, filter: &VehicleFilter, skip: i64, limit: i64)
        -> AppResult<Vec<Vehicle>>;

    async fn count(&self, filter: &VehicleFilter) -> AppResult<i64>;

    /// Aplica un cambio parcial; los campos en `None` conservan su valor.
    /// Devuelve `None` si el id no existe.
    async fn update_by_id(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Option<Vehicle>>;

    /// Escribe `status` en todas las filas que cumplan el criterio
    async fn update_many(
        &self,
        filter: &VehicleFilter,
        status: VehicleStatus,
    ) -> AppResult<BulkUpdateOutcome>;

    /// Devuelve `true` si la fila existía
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Predicado de búsqueda compartido entre SELECT, COUNT y UPDATE.
/// `$1` es el patrón ILIKE ya escapado.
const SEARCH_PREDICATE: &str = "(owner_name ILIKE $1 OR phone_number ILIKE $1 \
     OR address ILIKE $1 OR vehicle_number ILIKE $1 OR permitted_route ILIKE $1 \
     OR vehicle_type ILIKE $1 OR organization ILIKE $1)";

const MISSING_STATUS_PREDICATE: &str = "(status IS NULL OR status = '')";

/// Escapa los comodines de LIKE para que el término se busque literal
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Detecta la violación del índice único de vehicle_number
fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn insert(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let id = Uuid::new_v4();
        let vehicle_number = new.vehicle_number.clone();

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (id, owner_name, phone_number, address, vehicle_number,
                                  permitted_route, owner_image, vehicle_type, organization,
                                  status, lookup_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', NULL, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.owner_name)
        .bind(new.phone_number)
        .bind(new.address)
        .bind(new.vehicle_number)
        .bind(new.permitted_route)
        .bind(new.owner_image)
        .bind(new.vehicle_type)
        .bind(new.organization)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateVehicle(format!(
                    "Vehicle with number '{}' already exists",
                    vehicle_number
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn find(
        &self,
        filter: &VehicleFilter,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Vehicle>> {
        let rows = match filter {
            VehicleFilter::All => {
                sqlx::query_as::<_, VehicleRow>(
                    "SELECT * FROM vehicles ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
            VehicleFilter::Search(term) => {
                let sql = format!(
                    "SELECT * FROM vehicles WHERE {} ORDER BY created_at ASC, id ASC \
                     LIMIT $2 OFFSET $3",
                    SEARCH_PREDICATE
                );
                sqlx::query_as::<_, VehicleRow>(&sql)
                    .bind(like_pattern(term))
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            VehicleFilter::MissingStatus => {
                let sql = format!(
                    "SELECT * FROM vehicles WHERE {} ORDER BY created_at ASC, id ASC \
                     LIMIT $1 OFFSET $2",
                    MISSING_STATUS_PREDICATE
                );
                sqlx::query_as::<_, VehicleRow>(&sql)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn count(&self, filter: &VehicleFilter) -> AppResult<i64> {
        let count = match filter {
            VehicleFilter::All => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
                    .fetch_one(&self.pool)
                    .await?
            }
            VehicleFilter::Search(term) => {
                let sql = format!("SELECT COUNT(*) FROM vehicles WHERE {}", SEARCH_PREDICATE);
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(like_pattern(term))
                    .fetch_one(&self.pool)
                    .await?
            }
            VehicleFilter::MissingStatus => {
                let sql = format!(
                    "SELECT COUNT(*) FROM vehicles WHERE {}",
                    MISSING_STATUS_PREDICATE
                );
                sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn update_by_id(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Option<Vehicle>> {
        let conflict_number = patch.vehicle_number.clone();

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles SET
                owner_name = COALESCE($2, owner_name),
                phone_number = COALESCE($3, phone_number),
                address = COALESCE($4, address),
                vehicle_number = COALESCE($5, vehicle_number),
                permitted_route = COALESCE($6, permitted_route),
                owner_image = COALESCE($7, owner_image),
                vehicle_type = COALESCE($8, vehicle_type),
                organization = COALESCE($9, organization),
                status = COALESCE($10, status),
                lookup_token = COALESCE($11, lookup_token)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.owner_name)
        .bind(patch.phone_number)
        .bind(patch.address)
        .bind(patch.vehicle_number)
        .bind(patch.permitted_route)
        .bind(patch.owner_image)
        .bind(patch.vehicle_type)
        .bind(patch.organization)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.lookup_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateVehicle(format!(
                    "Vehicle with number '{}' already exists",
                    conflict_number.unwrap_or_default()
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.map(Vehicle::from))
    }

    async fn update_many(
        &self,
        filter: &VehicleFilter,
        status: VehicleStatus,
    ) -> AppResult<BulkUpdateOutcome> {
        let matched = self.count(filter).await?;

        let result = match filter {
            VehicleFilter::All => {
                sqlx::query("UPDATE vehicles SET status = $1 WHERE status IS DISTINCT FROM $1")
                    .bind(status.as_str())
                    .execute(&self.pool)
                    .await?
            }
            VehicleFilter::Search(term) => {
                let sql = format!(
                    "UPDATE vehicles SET status = $1 \
                     WHERE {} AND status IS DISTINCT FROM $1",
                    SEARCH_PREDICATE.replace("$1", "$2")
                );
                sqlx::query(&sql)
                    .bind(status.as_str())
                    .bind(like_pattern(term))
                    .execute(&self.pool)
                    .await?
            }
            VehicleFilter::MissingStatus => {
                let sql = format!(
                    "UPDATE vehicles SET status = $1 WHERE {}",
                    MISSING_STATUS_PREDICATE
                );
                sqlx::query(&sql)
                    .bind(status.as_str())
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(BulkUpdateOutcome {
            matched,
            modified: result.rows_affected(),
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Implementación en memoria sobre un HashMap protegido por RwLock.
/// Reproduce las mismas reglas que la implementación SQL, incluida la
/// unicidad del número de vehículo y el orden estable de inserción.
#[derive(Default)]
pub struct MemoryVehicleRepository {
    rows: RwLock<HashMap<Uuid, VehicleRow>>,
}

impl MemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Siembra una fila tal cual, sin normalizar. Útil para reproducir
    /// datos históricos (por ejemplo filas sin estado) en pruebas.
    pub async fn insert_raw(&self, row: VehicleRow) {
        self.rows.write().await.insert(row.id, row);
    }
}

fn row_matches(row: &VehicleRow, filter: &VehicleFilter) -> bool {
    match filter {
        VehicleFilter::All => true,
        VehicleFilter::Search(term) => {
            let needle = term.to_lowercase();
            let hit = |value: &str| value.to_lowercase().contains(&needle);
            hit(&row.owner_name)
                || hit(&row.phone_number)
                || hit(&row.address)
                || hit(&row.vehicle_number)
                || hit(&row.permitted_route)
                || row.vehicle_type.as_deref().map_or(false, hit)
                || row.organization.as_deref().map_or(false, hit)
        }
        VehicleFilter::MissingStatus => row.status.as_deref().map_or(true, |s| s.is_empty()),
    }
}

#[async_trait::async_trait]
impl VehicleRepository for MemoryVehicleRepository {
    async fn insert(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let mut rows = self.rows.write().await;

        if rows
            .values()
            .any(|row| row.vehicle_number == new.vehicle_number)
        {
            return Err(AppError::DuplicateVehicle(format!(
                "Vehicle with number '{}' already exists",
                new.vehicle_number
            )));
        }

        let row = VehicleRow {
            id: Uuid::new_v4(),
            owner_name: new.owner_name,
            phone_number: new.phone_number,
            address: new.address,
            vehicle_number: new.vehicle_number,
            permitted_route: new.permitted_route,
            owner_image: new.owner_image,
            vehicle_type: new.vehicle_type,
            organization: new.organization,
            status: Some(VehicleStatus::Active.as_str().to_string()),
            lookup_token: None,
            created_at: Utc::now(),
        };

        rows.insert(row.id, row.clone());
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned().map(Vehicle::from))
    }

    async fn find(
        &self,
        filter: &VehicleFilter,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Vehicle>> {
        let rows = self.rows.read().await;

        let mut selected: Vec<VehicleRow> = rows
            .values()
            .filter(|row| row_matches(row, filter))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(selected
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(Vehicle::from)
            .collect())
    }

    async fn count(&self, filter: &VehicleFilter) -> AppResult<i64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|row| row_matches(row, filter)).count() as i64)
    }

    async fn update_by_id(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Option<Vehicle>> {
        let mut rows = self.rows.write().await;

        if let Some(new_number) = &patch.vehicle_number {
            if rows
                .values()
                .any(|row| row.id != id && &row.vehicle_number == new_number)
            {
                return Err(AppError::DuplicateVehicle(format!(
                    "Vehicle with number '{}' already exists",
                    new_number
                )));
            }
        }

        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(value) = patch.owner_name {
            row.owner_name = value;
        }
        if let Some(value) = patch.phone_number {
            row.phone_number = value;
        }
        if let Some(value) = patch.address {
            row.address = value;
        }
        if let Some(value) = patch.vehicle_number {
            row.vehicle_number = value;
        }
        if let Some(value) = patch.permitted_route {
            row.permitted_route = value;
        }
        if let Some(value) = patch.owner_image {
            row.owner_image = Some(value);
        }
        if let Some(value) = patch.vehicle_type {
            row.vehicle_type = Some(value);
        }
        if let Some(value) = patch.organization {
            row.organization = Some(value);
        }
        if let Some(value) = patch.status {
            row.status = Some(value.as_str().to_string());
        }
        if let Some(value) = patch.lookup_token {
            row.lookup_token = Some(value);
        }

        Ok(Some(row.clone().into()))
    }

    async fn update_many(
        &self,
        filter: &VehicleFilter,
        status: VehicleStatus,
    ) -> AppResult<BulkUpdateOutcome> {
        let mut rows = self.rows.write().await;
        let target = Some(status.as_str().to_string());

        let mut matched = 0i64;
        let mut modified = 0u64;
        for row in rows.values_mut() {
            if !row_matches(row, filter) {
                continue;
            }
            matched += 1;
            if row.status != target {
                row.status = target.clone();
                modified += 1;
            }
        }

        Ok(BulkUpdateOutcome { matched, modified })
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id).is_some())
    }
}
