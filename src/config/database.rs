//! Parámetros del pool de PostgreSQL
//!
//! El registro es una API pequeña: el perfil por defecto prioriza pocas
//! conexiones estables sobre ráfagas grandes. `DB_MAX_CONNECTIONS`
//! permite subirlo en despliegues con más tráfico.

use std::time::Duration;

/// Configuración del pool de conexiones
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10);

        Self {
            max_connections,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}
