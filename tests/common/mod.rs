//! Utilidades compartidas por las pruebas de integración.
//!
//! Levantan la aplicación completa sobre las implementaciones en memoria
//! y exponen helpers para peticiones autenticadas, formularios multipart
//! y workbooks de Excel.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tower::ServiceExt;

use vehicle_registry::clients::asset_host::MemoryAssetHost;
use vehicle_registry::config::environment::EnvironmentConfig;
use vehicle_registry::middleware::auth::generate_jwt_token;
use vehicle_registry::models::user::{NewUser, User, UserRole};
use vehicle_registry::repositories::{
    MemorySettingsRepository, MemoryUserRepository, MemoryVehicleRepository, UserRepository,
};
use vehicle_registry::routes::create_app_router;
use vehicle_registry::services::registry_service::RegistryService;
use vehicle_registry::AppState;

pub const BASE_URL: &str = "http://registry.test";

const MULTIPART_BOUNDARY: &str = "registry-test-boundary";

/// Configuración fija de las pruebas. `Default` lee variables de entorno
/// y la suite no debe depender de ellas.
pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        base_url: BASE_URL.to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration: 3600,
        cors_origins: vec!["*".to_string()],
        asset_api_url: None,
        asset_api_key: None,
        asset_api_secret: None,
        asset_folder: "vehicles".to_string(),
    }
}

/// Aplicación completa sobre repositorios en memoria. Conserva los Arc
/// concretos para sembrar datos y forzar fallos desde las pruebas.
pub struct TestApp {
    pub router: Router,
    pub vehicles: Arc<MemoryVehicleRepository>,
    pub users: Arc<MemoryUserRepository>,
    pub settings: Arc<MemorySettingsRepository>,
    pub assets: Arc<MemoryAssetHost>,
    pub config: EnvironmentConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let vehicles = Arc::new(MemoryVehicleRepository::new());
        let users = Arc::new(MemoryUserRepository::new());
        let settings = Arc::new(MemorySettingsRepository::new());
        let assets = Arc::new(MemoryAssetHost::new());
        let config = test_config();

        let state = AppState::new(
            vehicles.clone(),
            users.clone(),
            settings.clone(),
            assets.clone(),
            config.clone(),
        );

        Self {
            router: create_app_router(state),
            vehicles,
            users,
            settings,
            assets,
            config,
        }
    }

    /// Servicio del registro sobre los mismos repositorios que el router
    pub fn registry(&self) -> RegistryService {
        RegistryService::new(
            self.vehicles.clone(),
            self.assets.clone(),
            BASE_URL.to_string(),
        )
    }

    pub async fn seed_user(&self, username: &str, password: &str, role: UserRole) -> User {
        // Coste mínimo de bcrypt para no frenar la suite
        let password_hash = bcrypt::hash(password, 4).unwrap();
        self.users
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                role,
                name: None,
                email: None,
                phone: None,
                image: None,
            })
            .await
            .unwrap()
    }

    /// Crea un admin y devuelve un JWT válido para él
    pub async fn admin_token(&self) -> String {
        let user = self.seed_user("admin", "secret123", UserRole::Admin).await;
        generate_jwt_token(&user, &self.config).unwrap()
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            bytes: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = builder("GET", uri, None).body(Body::empty()).unwrap();
        self.request(request).await
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>) -> TestResponse {
        let request = builder(method, uri, token).body(Body::empty()).unwrap();
        self.request(request).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> TestResponse {
        let request = builder(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.request(request).await
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        form: MultipartForm,
    ) -> TestResponse {
        let (content_type, body) = form.finish();
        let request = builder(method, uri, token)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("response body is not valid JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).expect("response body is not valid UTF-8")
    }
}

/// Cuerpo multipart/form-data armado a mano, con el mismo formato que
/// manda un navegador
#[derive(Default)]
pub struct MultipartForm {
    buffer: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buffer.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                MULTIPART_BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.buffer.extend_from_slice(bytes);
        self.buffer.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.buffer
            .extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
        (
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            self.buffer,
        )
    }
}

/// Formulario de alta con los cinco campos obligatorios
pub fn vehicle_form(number: &str) -> MultipartForm {
    MultipartForm::new()
        .text("ownerName", "Karim Uddin")
        .text("phoneNumber", "01712345678")
        .text("address", "12 Station Road, Chattogram")
        .text("vehicleNumber", number)
        .text("permittedRoute", "Airport - Central Station")
}

/// Workbook .xlsx en memoria con un encabezado y filas de texto
pub fn xlsx_with_rows(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .write_string((row_index + 1) as u32, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Decodifica el data URI de una tarjeta de vuelta al texto del QR
pub fn decode_qr_data_uri(data_uri: &str) -> String {
    let encoded = data_uri
        .strip_prefix("data:image/png;base64,")
        .expect("data URI prefix missing");
    let png = STANDARD.decode(encoded).expect("invalid base64 payload");

    let img = image::load_from_memory(&png)
        .expect("invalid PNG payload")
        .to_luma8();
    let (width, height) = img.dimensions();

    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            img.get_pixel(x as u32, y as u32)[0]
        });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");

    let (_meta, content) = grids[0].decode().expect("QR decode failed");
    content
}
