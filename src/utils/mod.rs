//! Utilidades compartidas: errores de la aplicación y validación
//! de formularios.

pub mod errors;
pub mod validation;
