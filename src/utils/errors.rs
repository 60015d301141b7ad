//! Errores de la aplicación
//!
//! Todos los fallos del registro terminan en `AppError`, que sabe
//! traducirse a una respuesta JSON con su código HTTP y un código
//! interno estable (`code`) que el frontend usa para distinguirlos.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

/// Todo lo que puede salir mal al atender una petición.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Duplicate vehicle: {0}")]
    DuplicateVehicle(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Maintenance mode: {0}")]
    Maintenance(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Cuerpo JSON de una respuesta de error.
///
/// `details` solo aparece cuando hay información extra (errores de
/// validación campo a campo, mensaje técnico de SQL).
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use StatusCode as S;

        let (status, body) = match self {
            AppError::Database(e) => {
                error!("❌ Error de base de datos: {}", e);
                (
                    S::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database",
                        "DB_ERROR",
                    )
                    .with_details(json!({ "sql_error": e.to_string() })),
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Datos inválidos: {}", e);
                (
                    S::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid",
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::DuplicateVehicle(msg) => {
                warn!("⚠️ Número de vehículo repetido: {}", msg);
                (
                    S::BAD_REQUEST,
                    ErrorResponse::new("Duplicate Vehicle", msg, "DUPLICATE_VEHICLE"),
                )
            }

            AppError::InvalidStatus(msg) => {
                warn!("⚠️ Estado no permitido: {}", msg);
                (
                    S::BAD_REQUEST,
                    ErrorResponse::new("Invalid Status", msg, "INVALID_STATUS"),
                )
            }

            AppError::NotFound(msg) => {
                warn!("⚠️ Recurso no encontrado: {}", msg);
                (S::NOT_FOUND, ErrorResponse::new("Not Found", msg, "NOT_FOUND"))
            }

            AppError::Encoding(msg) => {
                error!("❌ Error generando la tarjeta: {}", msg);
                (
                    S::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Encoding Error",
                        "An error occurred while generating the permit card",
                        "ENCODING_ERROR",
                    )
                    .with_details(json!({ "encoding_error": msg })),
                )
            }

            AppError::ExternalService(msg) => {
                error!("❌ Fallo del servicio de imágenes: {}", msg);
                (
                    S::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "External Service Error",
                        "An error occurred while communicating with external service",
                        "EXTERNAL_SERVICE_ERROR",
                    )
                    .with_details(json!({ "external_service_error": msg })),
                )
            }

            AppError::BadRequest(msg) => {
                warn!("⚠️ Petición malformada: {}", msg);
                (
                    S::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
                )
            }

            AppError::Unauthorized(msg) => {
                warn!("⚠️ Acceso no autorizado: {}", msg);
                (
                    S::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),
                )
            }

            // El gate de mantenimiento ya deja traza propia.
            AppError::Maintenance(msg) => (
                S::SERVICE_UNAVAILABLE,
                ErrorResponse::new("Service Unavailable", msg, "MAINTENANCE"),
            ),

            AppError::Internal(msg) => {
                error!("❌ Error interno: {}", msg);
                (
                    S::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred",
                        "INTERNAL_ERROR",
                    )
                    .with_details(json!({ "internal_error": msg })),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
