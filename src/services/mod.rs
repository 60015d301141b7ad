//! Lógica de negocio del registro
//!
//! Cada servicio agrupa una operación de alto nivel: altas, cambios y
//! bajas (`registry_service`), códigos QR de las tarjetas (`qr_service`),
//! importación masiva desde Excel (`import_service`) y el listado
//! paginado con búsqueda (`query_service`).

pub mod import_service;
pub mod qr_service;
pub mod query_service;
pub mod registry_service;

pub use import_service::*;
pub use qr_service::*;
pub use query_service::*;
pub use registry_service::*;
