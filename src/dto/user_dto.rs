//! DTOs de usuarios y moderadores

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;

/// Request de registro del administrador
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    // bcrypt solo procesa los primeros 72 bytes
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Usuario embebido en la response de login
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: String,
    pub username: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Response de registro
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Perfil del usuario autenticado (sin hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: String,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            role: user.role.as_str().to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            image: user.image,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Request para crear un moderador
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModeratorRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 30))]
    pub phone: String,

    #[validate(length(min = 6, max = 72))]
    pub password: String,

    pub image: Option<String>,
}

/// Response de moderador (sin hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: String,
}

impl From<User> for ModeratorResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            image: user.image,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Response tras eliminar un moderador
#[derive(Debug, Serialize)]
pub struct DeleteModeratorResponse {
    pub message: String,
}
