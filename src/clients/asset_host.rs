//! Cliente del asset host
//!
//! Las imágenes de los dueños se suben a un servicio externo de hosting
//! de imágenes. El trait permite sustituirlo en pruebas; la implementación
//! HTTP firma cada petición con SHA-256 igual que el proveedor.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Referencia a un asset ya subido
#[derive(Debug, Clone)]
pub struct AssetRef {
    /// URL pública de la imagen
    pub url: String,
    /// Identificador que el proveedor exige para borrarla
    pub public_ref: String,
}

#[async_trait::async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, bytes: &[u8], filename: &str) -> AppResult<AssetRef>;

    async fn delete(&self, public_ref: &str) -> AppResult<()>;
}

/// Deriva la referencia del proveedor desde una URL pública:
/// el último segmento del path sin su extensión.
pub fn public_ref_from_url(url: &str) -> Option<String> {
    let last_segment = url.rsplit('/').next().unwrap_or_default();
    let stem = last_segment.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Cliente HTTP contra el proveedor real
pub struct HostedAssetClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl HostedAssetClient {
    /// Construye el cliente si la configuración trae credenciales completas
    pub fn from_config(config: &EnvironmentConfig) -> Option<Self> {
        let base_url = config.asset_api_url.clone()?;
        let api_key = config.asset_api_key.clone()?;
        let api_secret = config.asset_api_secret.clone()?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            folder: config.asset_folder.clone(),
        })
    }

    /// Firma del proveedor: parámetros ordenados por clave, concatenados
    /// con '&' y rematados con el secreto, todo en SHA-256 hex
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<(&str, &str)> = params.to_vec();
        sorted.sort_by_key(|(key, _)| *key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

#[async_trait::async_trait]
impl AssetHost for HostedAssetClient {
    async fn upload(&self, bytes: &[u8], filename: &str) -> AppResult<AssetRef> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", &self.folder), ("timestamp", &timestamp)]);

        let file_part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(format!("{}/image/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Image upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Image upload failed with status {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid upload response: {}", e)))?;

        info!("🖼️ Imagen subida al asset host: {}", uploaded.public_id);
        Ok(AssetRef {
            url: uploaded.secure_url,
            public_ref: uploaded.public_id,
        })
    }

    async fn delete(&self, public_ref: &str) -> AppResult<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_ref), ("timestamp", &timestamp)]);

        let response = self
            .client
            .post(format!("{}/image/destroy", self.base_url))
            .form(&[
                ("public_id", public_ref),
                ("api_key", &self.api_key),
                ("timestamp", &timestamp),
                ("signature", &signature),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Image deletion failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Image deletion failed with status {}: {}",
                status, body
            )));
        }

        info!("🗑️ Imagen eliminada del asset host: {}", public_ref);
        Ok(())
    }
}

/// Asset host en memoria para pruebas y para entornos sin credenciales.
/// Registra cada subida y cada intento de borrado, y puede forzarse a
/// fallar para ejercitar los caminos de error.
#[derive(Default)]
pub struct MemoryAssetHost {
    uploads: RwLock<Vec<AssetRef>>,
    deleted: RwLock<Vec<String>>,
    delete_attempts: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryAssetHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub async fn uploads(&self) -> Vec<AssetRef> {
        self.uploads.read().await.clone()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AssetHost for MemoryAssetHost {
    async fn upload(&self, _bytes: &[u8], filename: &str) -> AppResult<AssetRef> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService(
                "Image upload rejected by asset host".to_string(),
            ));
        }

        let public_ref = Uuid::new_v4().simple().to_string();
        let extension = filename.rsplit('.').next().unwrap_or("bin");
        let asset = AssetRef {
            url: format!("https://assets.local/vehicles/{}.{}", public_ref, extension),
            public_ref,
        };

        self.uploads.write().await.push(asset.clone());
        Ok(asset)
    }

    async fn delete(&self, public_ref: &str) -> AppResult<()> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService(
                "Image deletion rejected by asset host".to_string(),
            ));
        }

        self.deleted.write().await.push(public_ref.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_ref_from_url_strips_path_and_extension() {
        assert_eq!(
            public_ref_from_url("https://assets.local/vehicles/abc123.png"),
            Some("abc123".to_string())
        );
        assert_eq!(
            public_ref_from_url("https://assets.local/deep/path/xyz.jpeg"),
            Some("xyz".to_string())
        );
    }

    #[test]
    fn test_public_ref_from_url_without_extension() {
        assert_eq!(
            public_ref_from_url("https://assets.local/vehicles/plain"),
            Some("plain".to_string())
        );
    }

    #[test]
    fn test_public_ref_from_url_rejects_empty_segments() {
        assert_eq!(public_ref_from_url("https://assets.local/vehicles/"), None);
        assert_eq!(public_ref_from_url(""), None);
        assert_eq!(public_ref_from_url(".png"), None);
    }
}
