//! Acceso a PostgreSQL: creación del pool y migraciones.

pub mod connection;

pub use connection::{create_pool, run_migrations};
