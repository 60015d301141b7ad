//! Servicio del registro de vehículos
//!
//! Orquesta las altas, ediciones y bajas: valida los campos obligatorios,
//! sube la imagen del dueño al asset host y mantiene el token QR de cada
//! tarjeta sincronizado con el registro.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::clients::asset_host::{public_ref_from_url, AssetHost, AssetRef};
use crate::dto::vehicle_dto::UploadedFile;
use crate::models::vehicle::{NewVehicle, Vehicle, VehiclePatch, VehicleStatus};
use crate::repositories::{BulkUpdateOutcome, VehicleFilter, VehicleRepository};
use crate::services::qr_service::QrService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::require_non_empty;

/// Alta de un vehículo. Los cinco campos de identificación son
/// obligatorios; el resto es opcional.
#[derive(Debug)]
pub struct CreateVehicle {
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub vehicle_number: String,
    pub permitted_route: String,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub owner_image: Option<UploadedFile>,
}

/// Edición parcial de un vehículo: solo viaja lo que cambia
#[derive(Debug, Default)]
pub struct UpdateVehicle {
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub permitted_route: Option<String>,
    pub vehicle_type: Option<String>,
    pub organization: Option<String>,
    pub owner_image: Option<UploadedFile>,
}

#[derive(Clone)]
pub struct RegistryService {
    vehicles: Arc<dyn VehicleRepository>,
    assets: Arc<dyn AssetHost>,
    qr: QrService,
    base_url: String,
}

impl RegistryService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        assets: Arc<dyn AssetHost>,
        base_url: String,
    ) -> Self {
        Self {
            vehicles,
            assets,
            qr: QrService::default(),
            base_url,
        }
    }

    /// Registra un vehículo nuevo y genera el token de su tarjeta.
    ///
    /// Si la inserción falla después de haber subido la imagen, la subida
    /// se revierte para no dejar huérfanos en el asset host.
    pub async fn create(&self, input: CreateVehicle) -> AppResult<Vehicle> {
        validate_required(&input)?;

        let mut uploaded: Option<AssetRef> = None;
        if let Some(image) = &input.owner_image {
            uploaded = Some(self.assets.upload(&image.bytes, &image.filename).await?);
        }

        let new = NewVehicle {
            owner_name: input.owner_name,
            phone_number: input.phone_number,
            address: input.address,
            vehicle_number: input.vehicle_number,
            permitted_route: input.permitted_route,
            owner_image: uploaded.as_ref().map(|asset| asset.url.clone()),
            vehicle_type: input.vehicle_type,
            organization: input.organization,
        };

        let inserted = match self.vehicles.insert(new).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                if let Some(asset) = uploaded {
                    self.discard_asset(&asset.public_ref).await;
                }
                return Err(e);
            }
        };

        let vehicle = self.attach_token(inserted.id).await?;
        info!(
            "🚗 Vehículo registrado: {} ({})",
            vehicle.vehicle_number, vehicle.id
        );
        Ok(vehicle)
    }

    /// Inserta un registro ya validado y le genera su token. Es el camino
    /// que comparte cada fila del importador masivo con el alta manual.
    pub async fn insert_with_token(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let inserted = self.vehicles.insert(new).await?;
        self.attach_token(inserted.id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_id(id).await
    }

    /// Aplica una edición parcial. El token de la tarjeta se regenera
    /// siempre, cambie o no algún campo.
    pub async fn update(&self, id: Uuid, changes: UpdateVehicle) -> AppResult<Vehicle> {
        let mut patch = VehiclePatch {
            owner_name: changes.owner_name,
            phone_number: changes.phone_number,
            address: changes.address,
            vehicle_number: changes.vehicle_number,
            permitted_route: changes.permitted_route,
            vehicle_type: changes.vehicle_type,
            organization: changes.organization,
            ..Default::default()
        };

        let mut uploaded: Option<AssetRef> = None;
        if let Some(image) = &changes.owner_image {
            let asset = self.assets.upload(&image.bytes, &image.filename).await?;
            patch.owner_image = Some(asset.url.clone());
            uploaded = Some(asset);
        }

        let updated = match self.vehicles.update_by_id(id, patch).await {
            Ok(Some(vehicle)) => vehicle,
            Ok(None) => {
                if let Some(asset) = uploaded {
                    self.discard_asset(&asset.public_ref).await;
                }
                return Err(AppError::NotFound("Vehicle not found".to_string()));
            }
            Err(e) => {
                if let Some(asset) = uploaded {
                    self.discard_asset(&asset.public_ref).await;
                }
                return Err(e);
            }
        };

        self.attach_token(updated.id).await
    }

    /// Cambia el estado de un vehículo sin tocar su token
    pub async fn set_status(&self, id: Uuid, status: &str) -> AppResult<Vehicle> {
        let parsed = parse_status(status)?;

        let updated = self
            .vehicles
            .update_by_id(
                id,
                VehiclePatch {
                    status: Some(parsed),
                    ..Default::default()
                },
            )
            .await?;

        updated.ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    /// Escribe el mismo estado en todos los vehículos del registro
    pub async fn set_all_status(
        &self,
        status: &str,
    ) -> AppResult<(VehicleStatus, BulkUpdateOutcome)> {
        let parsed = parse_status(status)?;
        let outcome = self
            .vehicles
            .update_many(&VehicleFilter::All, parsed)
            .await?;

        info!(
            "🔄 Estado global '{}': {} de {} filas reescritas",
            parsed, outcome.modified, outcome.matched
        );
        Ok((parsed, outcome))
    }

    /// Normaliza las filas históricas sin estado dejándolas en `active`.
    /// Es idempotente: una segunda pasada no encuentra nada que tocar.
    pub async fn backfill_status(&self) -> AppResult<BulkUpdateOutcome> {
        let outcome = self
            .vehicles
            .update_many(&VehicleFilter::MissingStatus, VehicleStatus::Active)
            .await?;

        info!(
            "🧹 Normalización de estados: {} filas sin estado actualizadas",
            outcome.modified
        );
        Ok(outcome)
    }

    /// Elimina un vehículo del registro. Los artefactos alojados fuera
    /// (imagen del dueño, tarjetas antiguas) se borran best-effort: si el
    /// asset host falla, la baja del registro sigue adelante.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if let Some(url) = vehicle.owner_image.as_deref() {
            self.discard_asset_by_url(url, "owner image").await;
        }
        if let Some(token) = vehicle.lookup_token.as_deref() {
            // Los tokens actuales son data URIs embebidos; solo las
            // tarjetas de la primera época guardaban una URL alojada
            if !token.starts_with("data:") {
                self.discard_asset_by_url(token, "legacy permit card").await;
            }
        }

        if !self.vehicles.delete_by_id(id).await? {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }

        info!("🗑️ Vehículo eliminado: {}", id);
        Ok(())
    }

    /// Regenera el token de consulta y lo persiste en el registro
    async fn attach_token(&self, id: Uuid) -> AppResult<Vehicle> {
        let token = self.qr.encode(&self.base_url, id)?;
        let updated = self
            .vehicles
            .update_by_id(
                id,
                VehiclePatch {
                    lookup_token: Some(token.data_uri),
                    ..Default::default()
                },
            )
            .await?;

        updated.ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    async fn discard_asset(&self, public_ref: &str) {
        if let Err(e) = self.assets.delete(public_ref).await {
            warn!("⚠️ No se pudo revertir la subida de imagen: {}", e);
        }
    }

    async fn discard_asset_by_url(&self, url: &str, what: &str) {
        let Some(public_ref) = public_ref_from_url(url) else {
            return;
        };
        if let Err(e) = self.assets.delete(&public_ref).await {
            warn!("⚠️ No se pudo borrar {} del asset host: {}", what, e);
        }
    }
}

fn parse_status(status: &str) -> AppResult<VehicleStatus> {
    VehicleStatus::parse(status).ok_or_else(|| {
        AppError::InvalidStatus("Status must be either 'active' or 'inactive'".to_string())
    })
}

fn validate_required(input: &CreateVehicle) -> AppResult<()> {
    let mut errors = ValidationErrors::new();
    require_non_empty(&mut errors, "ownerName", &input.owner_name);
    require_non_empty(&mut errors, "phoneNumber", &input.phone_number);
    require_non_empty(&mut errors, "address", &input.address);
    require_non_empty(&mut errors, "vehicleNumber", &input.vehicle_number);
    require_non_empty(&mut errors, "permittedRoute", &input.permitted_route);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
