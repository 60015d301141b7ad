//! Utilidades de validación
//!
//! Los formularios del registro llegan con los nombres de campo del
//! frontend (camelCase), así que los errores se acumulan con esos
//! mismos nombres para que el panel pueda pintarlos junto a cada input.

use validator::{ValidationError, ValidationErrors};

/// Acumula un error `required` sobre `errors` si el campo viene vacío.
///
/// Permite reportar todos los campos faltantes de una sola vez en lugar
/// de fallar en el primero.
pub fn require_non_empty(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(format!("{} is required", field).into());
        errors.add(field, error);
    }
}
