//! Controller de configuración operativa
//!
//! Administra las filas de settings y el modo mantenimiento. El update va
//! autenticado por el secreto de la propia fila en lugar del JWT, para
//! poder apagar el mantenimiento aunque el panel esté bloqueado.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::settings_dto::{
    CreateSettingsRequest, MaintenanceStatusResponse, SettingsResponse, UpdateSettingsRequest,
    UpdateSettingsResponse,
};
use crate::dto::ApiResponse;
use crate::models::settings::NewSettings;
use crate::repositories::SettingsRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct SettingsController {
    settings: Arc<dyn SettingsRepository>,
}

impl SettingsController {
    pub fn new(state: &AppState) -> Self {
        Self {
            settings: state.settings.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateSettingsRequest,
    ) -> AppResult<ApiResponse<SettingsResponse>> {
        request.validate()?;

        let settings = self
            .settings
            .insert(NewSettings {
                secret: request.secret,
                is_maintenance: request.is_maintenance.unwrap_or(false),
                maintenance_message: request.maintenance_message,
            })
            .await?;

        info!("⚙️ Configuración creada: {}", settings.id);
        Ok(ApiResponse::success(SettingsResponse::from(settings)))
    }

    pub async fn list(&self) -> AppResult<Vec<SettingsResponse>> {
        let all = self.settings.find_all().await?;
        Ok(all.into_iter().map(SettingsResponse::from).collect())
    }

    /// Estado actual del modo mantenimiento. `None` cuando todavía no se
    /// creó ninguna configuración.
    pub async fn maintenance_status(&self) -> AppResult<Option<MaintenanceStatusResponse>> {
        let current = self.settings.find_current().await?;

        Ok(current.map(|settings| MaintenanceStatusResponse {
            is_maintenance: settings.is_maintenance,
            maintenance_message: settings.maintenance_message,
        }))
    }

    pub async fn update(
        &self,
        secret: &str,
        request: UpdateSettingsRequest,
    ) -> AppResult<UpdateSettingsResponse> {
        let updated = self
            .settings
            .update_by_secret(secret, request.is_maintenance)
            .await?
            .ok_or_else(|| AppError::NotFound("Secret not found.".to_string()))?;

        info!(
            "🚧 Modo mantenimiento {} (configuración {})",
            if updated.is_maintenance {
                "activado"
            } else {
                "desactivado"
            },
            updated.id
        );

        Ok(UpdateSettingsResponse {
            message: "Update Successfully...".to_string(),
            data: SettingsResponse::from(updated),
        })
    }
}
