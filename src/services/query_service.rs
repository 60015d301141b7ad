//! Listado paginado del registro

use std::sync::Arc;

use crate::models::vehicle::Vehicle;
use crate::repositories::{VehicleFilter, VehicleRepository};
use crate::utils::errors::AppResult;

/// Una página de resultados junto con los totales del filtro
#[derive(Debug)]
pub struct VehiclePage {
    pub items: Vec<Vehicle>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

pub struct QueryService {
    vehicles: Arc<dyn VehicleRepository>,
}

impl QueryService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    /// Devuelve una página del registro en orden estable de inserción.
    /// `page` y `page_size` llegan ya saneados (>= 1). Un término de
    /// búsqueda en blanco equivale a no filtrar.
    pub async fn list(&self, page: i64, page_size: i64, search: &str) -> AppResult<VehiclePage> {
        let term = search.trim();
        let filter = if term.is_empty() {
            VehicleFilter::All
        } else {
            VehicleFilter::Search(term.to_string())
        };

        let total = self.vehicles.count(&filter).await?;
        // Saturante: una página absurdamente grande cae más allá del final
        // y devuelve una lista vacía en lugar de desbordar el offset
        let skip = (page - 1).saturating_mul(page_size);
        let items = self.vehicles.find(&filter, skip, page_size).await?;

        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        Ok(VehiclePage {
            items,
            total,
            page,
            page_size,
            total_pages,
        })
    }
}
