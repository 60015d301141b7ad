//! Modo mantenimiento
//!
//! Cuando la configuración activa marca `is_maintenance`, toda la API
//! responde 503 salvo las rutas que permiten administrar ese mismo modo.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{state::AppState, utils::errors::AppError};

/// Rutas exentas del bloqueo. Sin esta lista no habría forma de
/// desactivar el mantenimiento una vez activado.
fn is_exempt(path: &str) -> bool {
    path.starts_with("/settings/update") || path.starts_with("/settings/maintenance-status")
}

pub async fn maintenance_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_exempt(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    if let Some(settings) = state.settings.find_current().await? {
        if settings.is_maintenance {
            let message = settings.maintenance_message.unwrap_or_else(|| {
                "The system is currently under maintenance. Please try again later.".to_string()
            });
            return Err(AppError::Maintenance(message));
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_routes_stay_reachable() {
        assert!(is_exempt("/settings/maintenance-status"));
        assert!(is_exempt("/settings/update/super-secret"));
        assert!(!is_exempt("/vehicles/getAll"));
        assert!(!is_exempt("/settings"));
    }
}
