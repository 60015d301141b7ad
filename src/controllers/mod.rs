//! Controllers de la API
//!
//! Cada controller agrupa las operaciones de un recurso; la extracción
//! HTTP vive en las rutas.

pub mod auth_controller;
pub mod moderator_controller;
pub mod settings_controller;
pub mod vehicle_controller;
