//! Modelos del dominio
//!
//! Structs que mapean fila a fila las tablas del registro: vehículos,
//! usuarios del panel y configuraciones del sistema.

pub mod settings;
pub mod user;
pub mod vehicle;
