//! Controller de autenticación de administradores
//!
//! Registro y login con bcrypt + JWT. El login responde lo mismo ante
//! usuario inexistente y contraseña incorrecta para no filtrar cuáles
//! usernames existen.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::info;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::user_dto::{
    LoginRequest, LoginResponse, LoginUser, RegisterRequest, RegisterResponse,
    UserProfileResponse,
};
use crate::middleware::auth::{generate_jwt_token, AuthenticatedUser};
use crate::models::user::{NewUser, UserRole};
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    users: Arc<dyn UserRepository>,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            config: state.config.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        request.validate()?;

        let username = request.username.trim().to_string();
        let password = request.password.trim();

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let user = self
            .users
            .insert(NewUser {
                username,
                password_hash,
                role: UserRole::Admin,
                name: None,
                email: None,
                phone: None,
                image: None,
            })
            .await?;

        info!("👤 Administrador registrado: {}", user.username);
        Ok(RegisterResponse {
            message: "Admin created successfully".to_string(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let username = request.username.trim();
        let password = request.password.trim();

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let password_matches = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !password_matches {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = generate_jwt_token(&user, &self.config)?;

        info!("🔑 Login de {}", user.username);
        Ok(LoginResponse {
            token,
            user: LoginUser {
                id: user.id.to_string(),
                username: user.username,
            },
        })
    }

    pub async fn profile(&self, auth: &AuthenticatedUser) -> AppResult<UserProfileResponse> {
        let user = self
            .users
            .find_by_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserProfileResponse::from(user))
    }
}
