//! Repositorio de configuración operativa

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::settings::{NewSettings, Settings};
use crate::utils::errors::{AppError, AppResult};

#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Inserta una configuración; falla con `BadRequest` si el secreto
    /// ya está en uso
    async fn insert(&self, new: NewSettings) -> AppResult<Settings>;

    async fn find_all(&self) -> AppResult<Vec<Settings>>;

    /// La configuración vigente: la más antigua registrada
    async fn find_current(&self) -> AppResult<Option<Settings>>;

    /// Cambia el modo mantenimiento de la fila cuyo secreto coincida.
    /// Devuelve `None` si ningún secreto coincide.
    async fn update_by_secret(
        &self,
        secret: &str,
        is_maintenance: bool,
    ) -> AppResult<Option<Settings>>;
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn insert(&self, new: NewSettings) -> AppResult<Settings> {
        let now = Utc::now();
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            INSERT INTO settings (id, secret, is_maintenance, maintenance_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.secret)
        .bind(new.is_maintenance)
        .bind(new.maintenance_message)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("Settings with this secret already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(settings)
    }

    async fn find_all(&self) -> AppResult<Vec<Settings>> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT * FROM settings ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn find_current(&self) -> AppResult<Option<Settings>> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT * FROM settings ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn update_by_secret(
        &self,
        secret: &str,
        is_maintenance: bool,
    ) -> AppResult<Option<Settings>> {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            UPDATE settings SET is_maintenance = $2, updated_at = $3
            WHERE secret = $1
            RETURNING *
            "#,
        )
        .bind(secret)
        .bind(is_maintenance)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }
}

/// Implementación en memoria para pruebas y desarrollo
#[derive(Default)]
pub struct MemorySettingsRepository {
    rows: RwLock<HashMap<Uuid, Settings>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(rows: &HashMap<Uuid, Settings>) -> Vec<Settings> {
    let mut all: Vec<Settings> = rows.values().cloned().collect();
    all.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    all
}

#[async_trait::async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn insert(&self, new: NewSettings) -> AppResult<Settings> {
        let mut rows = self.rows.write().await;

        if rows.values().any(|row| row.secret == new.secret) {
            return Err(AppError::BadRequest(
                "Settings with this secret already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let settings = Settings {
            id: Uuid::new_v4(),
            secret: new.secret,
            is_maintenance: new.is_maintenance,
            maintenance_message: new.maintenance_message,
            created_at: now,
            updated_at: now,
        };

        rows.insert(settings.id, settings.clone());
        Ok(settings)
    }

    async fn find_all(&self) -> AppResult<Vec<Settings>> {
        let rows = self.rows.read().await;
        Ok(sorted(&rows))
    }

    async fn find_current(&self) -> AppResult<Option<Settings>> {
        let rows = self.rows.read().await;
        Ok(sorted(&rows).into_iter().next())
    }

    async fn update_by_secret(
        &self,
        secret: &str,
        is_maintenance: bool,
    ) -> AppResult<Option<Settings>> {
        let mut rows = self.rows.write().await;

        let Some(settings) = rows.values_mut().find(|row| row.secret == secret) else {
            return Ok(None);
        };

        settings.is_maintenance = is_maintenance;
        settings.updated_at = Utc::now();
        Ok(Some(settings.clone()))
    }
}
