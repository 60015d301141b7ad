//! Configuración del registro
//!
//! Separada en dos piezas: las variables de entorno que definen el
//! despliegue (`environment`) y los parámetros del pool de PostgreSQL
//! (`database`).

pub mod database;
pub mod environment;

pub use environment::*;
