pub mod moderator_routes;
pub mod settings_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_from_config;
use crate::middleware::maintenance::maintenance_gate;
use crate::state::AppState;

/// Suficiente para la foto del dueño o un Excel de decenas de miles de filas
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Arma el router completo de la aplicación con sus capas transversales
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/moderators", moderator_routes::create_moderator_router())
        .nest("/settings", settings_routes::create_settings_router())
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            maintenance_gate,
        ))
        .layer(TraceLayer::new_for_http())
        // Las tarjetas HTML y los data URIs de los QR comprimen muy bien
        .layer(CompressionLayer::new())
        .layer(cors_from_config(&state.config))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "vehicle-registry-api"
    }))
}
