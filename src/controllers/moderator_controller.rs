//! Controller de moderadores
//!
//! El administrador da de alta, lista y elimina las cuentas de moderador.
//! Los moderadores inician sesión con su email, así que el email hace de
//! username en la tabla de usuarios.

use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{CreateModeratorRequest, DeleteModeratorResponse, ModeratorResponse};
use crate::models::user::{NewUser, UserRole};
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct ModeratorController {
    users: Arc<dyn UserRepository>,
}

impl ModeratorController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
        }
    }

    pub async fn create(&self, request: CreateModeratorRequest) -> AppResult<ModeratorResponse> {
        request.validate()?;

        if self.users.find_by_username(&request.email).await?.is_some() {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let user = self
            .users
            .insert(NewUser {
                username: request.email.clone(),
                password_hash,
                role: UserRole::Moderator,
                name: Some(request.name),
                email: Some(request.email),
                phone: Some(request.phone),
                image: request.image,
            })
            .await?;

        info!("👥 Moderador creado: {}", user.username);
        Ok(ModeratorResponse::from(user))
    }

    pub async fn list(&self) -> AppResult<Vec<ModeratorResponse>> {
        let moderators = self.users.find_by_role(UserRole::Moderator).await?;
        Ok(moderators.into_iter().map(ModeratorResponse::from).collect())
    }

    /// Elimina una cuenta de moderador. Las cuentas de administrador no se
    /// pueden borrar por esta vía.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteModeratorResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .filter(|user| user.role == UserRole::Moderator)
            .ok_or_else(|| AppError::NotFound("Moderator not found".to_string()))?;

        if !self.users.delete_by_id(user.id).await? {
            return Err(AppError::NotFound("Moderator not found".to_string()));
        }

        info!("🗑️ Moderador eliminado: {}", user.id);
        Ok(DeleteModeratorResponse {
            message: "Moderator deleted successfully".to_string(),
        })
    }
}
