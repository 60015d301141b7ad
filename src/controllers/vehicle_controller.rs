//! Controller del registro de vehículos
//!
//! Traduce los DTOs del API a llamadas sobre los servicios del registro
//! y arma las responses con los mensajes que el frontend ya conoce.

use uuid::Uuid;

use crate::dto::vehicle_dto::{
    BackfillStatusResponse, DeleteVehicleResponse, ImportResponse, ListVehiclesQuery,
    PaginationMeta, SetAllStatusResponse, StatusUpdateResponse, UpdateStatusRequest, VehicleForm,
    VehicleListResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::import_service::ImportService;
use crate::services::query_service::QueryService;
use crate::services::registry_service::{CreateVehicle, RegistryService, UpdateVehicle};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

const PERMIT_TEMPLATE: &str = include_str!("../../templates/vehicle.html");
const BLOCKED_TEMPLATE: &str = include_str!("../../templates/vehicle-blocked.html");

/// Página pública que resuelve un código escaneado
#[derive(Debug)]
pub enum PermitCard {
    /// Vehículo activo: tarjeta completa
    Active(String),
    /// Vehículo bloqueado: aviso con los datos mínimos
    Blocked(String),
    /// El identificador no corresponde a ningún vehículo
    NotFound,
}

pub struct VehicleController {
    registry: RegistryService,
    importer: ImportService,
    query: QueryService,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        let registry = RegistryService::new(
            state.vehicles.clone(),
            state.assets.clone(),
            state.config.base_url.clone(),
        );
        Self {
            importer: ImportService::new(registry.clone()),
            query: QueryService::new(state.vehicles.clone()),
            registry,
        }
    }

    pub async fn create(&self, form: VehicleForm) -> AppResult<VehicleResponse> {
        let input = CreateVehicle {
            owner_name: form.owner_name.unwrap_or_default(),
            phone_number: form.phone_number.unwrap_or_default(),
            address: form.address.unwrap_or_default(),
            vehicle_number: form.vehicle_number.unwrap_or_default(),
            permitted_route: form.permitted_route.unwrap_or_default(),
            vehicle_type: form.vehicle_type,
            organization: form.organization,
            owner_image: form.owner_image,
        };

        let vehicle = self.registry.create(input).await?;
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self, query: ListVehiclesQuery) -> AppResult<VehicleListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let search = query.search.unwrap_or_default();

        let result = self.query.list(page, limit, &search).await?;

        Ok(VehicleListResponse {
            vehicles: result
                .items
                .into_iter()
                .map(VehicleResponse::from)
                .collect(),
            pagination: PaginationMeta {
                total: result.total,
                page: result.page,
                limit: result.page_size,
                total_pages: result.total_pages,
            },
        })
    }

    pub async fn details(&self, id: Uuid) -> AppResult<ApiResponse<VehicleResponse>> {
        let vehicle = self
            .registry
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(ApiResponse::success(VehicleResponse::from(vehicle)))
    }

    /// Resuelve un escaneo a la tarjeta HTML según el estado del vehículo
    pub async fn card(&self, id: Uuid) -> AppResult<PermitCard> {
        let Some(vehicle) = self.registry.get(id).await? else {
            return Ok(PermitCard::NotFound);
        };

        if vehicle.status == VehicleStatus::Inactive {
            return Ok(PermitCard::Blocked(render_blocked(&vehicle)));
        }

        Ok(PermitCard::Active(render_permit(&vehicle)))
    }

    pub async fn update(&self, id: Uuid, form: VehicleForm) -> AppResult<VehicleResponse> {
        let changes = UpdateVehicle {
            owner_name: form.owner_name,
            phone_number: form.phone_number,
            address: form.address,
            vehicle_number: form.vehicle_number,
            permitted_route: form.permitted_route,
            vehicle_type: form.vehicle_type,
            organization: form.organization,
            owner_image: form.owner_image,
        };

        let vehicle = self.registry.update(id, changes).await?;
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        request: UpdateStatusRequest,
    ) -> AppResult<StatusUpdateResponse> {
        let status = request.status.unwrap_or_default();
        let vehicle = self.registry.set_status(id, &status).await?;

        Ok(StatusUpdateResponse {
            message: format!("Vehicle status updated to {} successfully", status),
            vehicle: VehicleResponse::from(vehicle),
        })
    }

    pub async fn set_all_status(
        &self,
        request: UpdateStatusRequest,
    ) -> AppResult<SetAllStatusResponse> {
        let status = request.status.unwrap_or_default();
        let (parsed, outcome) = self.registry.set_all_status(&status).await?;

        Ok(SetAllStatusResponse {
            success: true,
            message: format!("All vehicles status updated to {} successfully", parsed),
            updated_count: outcome.modified,
            matched_count: outcome.matched,
            total_vehicles: outcome.matched,
        })
    }

    pub async fn backfill_status(&self) -> AppResult<BackfillStatusResponse> {
        let outcome = self.registry.backfill_status().await?;

        Ok(BackfillStatusResponse {
            message: "Existing vehicles status updated successfully".to_string(),
            updated_count: outcome.modified,
            matched_count: outcome.matched,
        })
    }

    pub async fn import(&self, bytes: &[u8]) -> AppResult<ImportResponse> {
        let report = self.importer.import(bytes).await?;

        Ok(ImportResponse {
            message: "Excel data inserted in batches successfully".to_string(),
            imported: report.imported,
            skipped: report.skipped,
            total: report.total,
            records: report.records,
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteVehicleResponse> {
        self.registry.delete(id).await?;

        Ok(DeleteVehicleResponse {
            message: "Vehicle deleted successfully".to_string(),
        })
    }
}

/// Escapa un valor antes de sustituirlo en la tarjeta: la página es
/// pública y los campos los escribe el panel, no pueden llevar HTML.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_permit(vehicle: &Vehicle) -> String {
    PERMIT_TEMPLATE
        .replace("{{vehicleNumber}}", &escape_html(&vehicle.vehicle_number))
        .replace("{{ownerName}}", &escape_html(&vehicle.owner_name))
        .replace("{{phoneNumber}}", &escape_html(&vehicle.phone_number))
        .replace("{{address}}", &escape_html(&vehicle.address))
        .replace(
            "{{permittedRoute}}",
            &escape_html(&vehicle.permitted_route),
        )
        .replace(
            "{{ownerImage}}",
            &escape_html(vehicle.owner_image.as_deref().unwrap_or("")),
        )
        .replace(
            "{{qrCode}}",
            &escape_html(vehicle.lookup_token.as_deref().unwrap_or("")),
        )
}

fn render_blocked(vehicle: &Vehicle) -> String {
    BLOCKED_TEMPLATE
        .replace("{{vehicleNumber}}", &escape_html(&vehicle.vehicle_number))
        .replace("{{ownerName}}", &escape_html(&vehicle.owner_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("A & B \"Ltd\""), "A &amp; B &quot;Ltd&quot;");
        assert_eq!(escape_html("DHK-1001"), "DHK-1001");
    }
}
