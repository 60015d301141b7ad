//! Estado compartido de la aplicación
//!
//! Lo que viaja dentro del router de Axum. Los repositorios y el asset
//! host van como trait objects: el mismo router sirve con Postgres en
//! producción y con las implementaciones en memoria en las pruebas.

use std::sync::Arc;

use crate::clients::asset_host::AssetHost;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{SettingsRepository, UserRepository, VehicleRepository};

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub assets: Arc<dyn AssetHost>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        users: Arc<dyn UserRepository>,
        settings: Arc<dyn SettingsRepository>,
        assets: Arc<dyn AssetHost>,
        config: EnvironmentConfig,
    ) -> Self {
        Self {
            vehicles,
            users,
            settings,
            assets,
            config,
        }
    }
}
