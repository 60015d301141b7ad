//! Middleware transversal
//!
//! Autenticación por JWT, política de CORS y el gate de mantenimiento
//! que se antepone a toda la API.

pub mod auth;
pub mod cors;
pub mod maintenance;

pub use auth::*;
pub use cors::*;
pub use maintenance::*;
