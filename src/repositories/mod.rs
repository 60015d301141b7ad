//! Repositorios de acceso al almacén
//!
//! Cada repositorio expone un trait con el contrato, una implementación
//! PostgreSQL y otra en memoria.

pub mod settings_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use settings_repository::{MemorySettingsRepository, PgSettingsRepository, SettingsRepository};
pub use user_repository::{MemoryUserRepository, PgUserRepository, UserRepository};
pub use vehicle_repository::{
    BulkUpdateOutcome, MemoryVehicleRepository, PgVehicleRepository, VehicleFilter,
    VehicleRepository,
};
