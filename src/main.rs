use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};

use vehicle_registry::clients::asset_host::{AssetHost, HostedAssetClient, MemoryAssetHost};
use vehicle_registry::config::environment::EnvironmentConfig;
use vehicle_registry::database::{create_pool, run_migrations};
use vehicle_registry::repositories::{
    PgSettingsRepository, PgUserRepository, PgVehicleRepository, SettingsRepository,
    UserRepository, VehicleRepository,
};
use vehicle_registry::routes::create_app_router;
use vehicle_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // El .env se carga antes de leer EnvironmentConfig
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // DEBUG en desarrollo, INFO en el resto
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚗 Vehicle Registry API");
    info!("=======================");

    // Pool y migraciones antes de aceptar tráfico
    let pool = create_pool(None).await?;
    run_migrations(&pool).await?;

    let vehicles: Arc<dyn VehicleRepository> = Arc::new(PgVehicleRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let settings: Arc<dyn SettingsRepository> = Arc::new(PgSettingsRepository::new(pool.clone()));

    // Asset host externo; sin credenciales se cae a uno en memoria, útil
    // en desarrollo pero volátil
    let assets: Arc<dyn AssetHost> = match HostedAssetClient::from_config(&config) {
        Some(client) => Arc::new(client),
        None => {
            warn!("⚠️ Asset host sin configurar: las imágenes no persisten entre reinicios");
            Arc::new(MemoryAssetHost::new())
        }
    };

    let state = AppState::new(vehicles, users, settings, assets, config.clone());
    let app = create_app_router(state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("🚗 Vehículos:");
    info!("   POST   /vehicles/add - Registrar vehículo (multipart)");
    info!("   GET    /vehicles/getAll - Listado paginado con búsqueda");
    info!("   GET    /vehicles/:id - Tarjeta pública (HTML)");
    info!("   GET    /vehicles/:id/details - Detalle JSON");
    info!("   PUT    /vehicles/:id - Actualizar campos");
    info!("   PATCH  /vehicles/:id/status - Cambiar estado");
    info!("   PATCH  /vehicles/status/all - Cambiar estado de todos");
    info!("   POST   /vehicles/update-status - Normalizar estados faltantes");
    info!("   POST   /vehicles/upload/excel - Importación masiva");
    info!("   DELETE /vehicles/:id - Eliminar vehículo");
    info!("👤 Usuarios:");
    info!("   POST   /users/register - Registrar administrador");
    info!("   POST   /users/login - Login (JWT)");
    info!("   GET    /users/profile - Perfil del usuario autenticado");
    info!("👥 Moderadores:");
    info!("   POST   /moderators - Crear moderador");
    info!("   GET    /moderators - Listar moderadores");
    info!("   DELETE /moderators/:id - Eliminar moderador");
    info!("⚙️ Configuración:");
    info!("   GET    /settings - Listar configuraciones");
    info!("   GET    /settings/maintenance-status - Estado de mantenimiento");
    info!("   POST   /settings/create - Crear configuración");
    info!("   PUT    /settings/update/:secret - Cambiar modo mantenimiento");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Espera SIGINT o SIGTERM y resuelve cuando toca apagar.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C recibido, cerrando el registro..."),
        _ = terminate => info!("🛑 SIGTERM recibido, cerrando el registro..."),
    }
}
