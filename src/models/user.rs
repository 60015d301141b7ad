//! Modelo de User
//!
//! Usuarios del panel administrativo: el administrador principal y los
//! moderadores que gestiona. Mapea a la tabla `users`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Rol del usuario dentro del panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Moderator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Moderator => "moderator",
        }
    }

    /// Interpreta el rol almacenado; valores desconocidos degradan a admin
    /// porque las primeras versiones del panel no guardaban rol.
    pub fn from_db(value: &str) -> Self {
        match value {
            "moderator" => UserRole::Moderator,
            _ => UserRole::Admin,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuario del panel, normalizado para el dominio
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fila cruda de la tabla `users`
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = UserRole::from_db(&row.role);
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            name: row.name,
            email: row.email,
            phone: row.phone,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

/// Datos para crear un usuario nuevo
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}
