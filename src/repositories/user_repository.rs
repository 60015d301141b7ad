//! Repositorio de usuarios del panel

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserRole, UserRow};
use crate::utils::errors::{AppError, AppResult};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserta un usuario; falla con `BadRequest` si el username ya existe
    async fn insert(&self, new: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Búsqueda por username sin distinguir mayúsculas
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, role, name, email, phone, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.username)
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("User already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row =
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE role = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Implementación en memoria para pruebas y desarrollo
#[derive(Default)]
pub struct MemoryUserRepository {
    rows: RwLock<HashMap<Uuid, UserRow>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, new: NewUser) -> AppResult<User> {
        let mut rows = self.rows.write().await;

        if rows
            .values()
            .any(|row| row.username.eq_ignore_ascii_case(&new.username))
        {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            role: new.role.as_str().to_string(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            image: new.image,
            created_at: Utc::now(),
        };

        rows.insert(row.id, row.clone());
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned().map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|row| row.username.eq_ignore_ascii_case(username))
            .cloned()
            .map(User::from))
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let rows = self.rows.read().await;

        let mut selected: Vec<UserRow> = rows
            .values()
            .filter(|row| row.role == role.as_str())
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(selected.into_iter().map(User::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id).is_some())
    }
}
