//! # Vehicle Registry API
//!
//! Registro de vehículos livianos con tarjeta de circulación QR: altas
//! manuales con foto del dueño, importación masiva desde Excel, búsqueda
//! paginada, panel admin/moderadores con JWT y modo mantenimiento.
//!
//! El binario (`main.rs`) arma el estado contra Postgres y el asset host
//! HTTP; la librería expone los módulos para que las pruebas de
//! integración construyan el mismo router sobre implementaciones en
//! memoria.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
