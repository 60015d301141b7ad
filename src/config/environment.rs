//! Variables de entorno del despliegue
//!
//! Todo lo que el registro lee del entorno pasa por aquí. Solo
//! `BASE_URL` y `JWT_SECRET` son obligatorias; el resto tiene valores
//! razonables para desarrollo.

use std::env;

/// Parámetros del despliegue leídos al arrancar.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// URL pública del servicio; es la base de los tokens de consulta
    /// impresos en las tarjetas de permiso
    pub base_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    // Credenciales del asset host (opcionales: sin ellas las imágenes
    // se guardan en el host en memoria)
    pub asset_api_url: Option<String>,
    pub asset_api_key: Option<String>,
    pub asset_api_secret: Option<String>,
    pub asset_folder: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env_or("ENVIRONMENT", "development"),
            port: env_or("PORT", "5000")
                .parse()
                .expect("PORT must be a valid number"),
            host: env_or("HOST", "0.0.0.0"),
            base_url: env::var("BASE_URL").expect("BASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env_or("JWT_EXPIRATION", "3600")
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: split_csv(&env_or("CORS_ORIGINS", "*")),
            asset_api_url: env::var("ASSET_API_URL").ok(),
            asset_api_key: env::var("ASSET_API_KEY").ok(),
            asset_api_secret: env::var("ASSET_API_SECRET").ok(),
            asset_folder: env_or("ASSET_FOLDER", "vehicles"),
        }
    }
}

impl EnvironmentConfig {
    /// `true` cuando `ENVIRONMENT` es `development`
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Dirección de escucha del servidor (`host:puerto`)
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
