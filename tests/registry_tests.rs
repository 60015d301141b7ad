//! Pruebas del servicio del registro sobre los repositorios en memoria

mod common;

use chrono::Utc;
use uuid::Uuid;

use common::{decode_qr_data_uri, TestApp, BASE_URL};
use vehicle_registry::dto::vehicle_dto::UploadedFile;
use vehicle_registry::models::vehicle::{VehicleRow, VehicleStatus};
use vehicle_registry::repositories::{VehicleFilter, VehicleRepository};
use vehicle_registry::services::registry_service::{CreateVehicle, UpdateVehicle};
use vehicle_registry::AppError;

fn create_input(number: &str) -> CreateVehicle {
    CreateVehicle {
        owner_name: "Karim Uddin".to_string(),
        phone_number: "01712345678".to_string(),
        address: "12 Station Road, Chattogram".to_string(),
        vehicle_number: number.to_string(),
        permitted_route: "Airport - Central Station".to_string(),
        vehicle_type: Some("CNG".to_string()),
        organization: None,
        owner_image: None,
    }
}

fn sample_image() -> UploadedFile {
    UploadedFile {
        filename: "owner.png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

fn legacy_row(number: &str, status: Option<&str>, token: Option<&str>) -> VehicleRow {
    VehicleRow {
        id: Uuid::new_v4(),
        owner_name: "Rahim Mia".to_string(),
        phone_number: "01898765432".to_string(),
        address: "4 College Gate".to_string(),
        vehicle_number: number.to_string(),
        permitted_route: "College Gate - Market".to_string(),
        owner_image: None,
        vehicle_type: None,
        organization: None,
        status: status.map(str::to_string),
        lookup_token: token.map(str::to_string),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_create_generates_scannable_token() {
    let app = TestApp::new();
    let registry = app.registry();

    let vehicle = registry.create(create_input("DHK-1001")).await.unwrap();

    assert_eq!(vehicle.status, VehicleStatus::Active);
    let token = vehicle.lookup_token.expect("token missing after create");
    assert_eq!(
        decode_qr_data_uri(&token),
        format!("{}/vehicles/{}", BASE_URL, vehicle.id)
    );
}

#[tokio::test]
async fn test_create_rejects_duplicate_vehicle_number() {
    let app = TestApp::new();
    let registry = app.registry();

    registry.create(create_input("DHK-1002")).await.unwrap();
    let err = registry.create(create_input("DHK-1002")).await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateVehicle(_)));
    assert_eq!(app.vehicles.count(&VehicleFilter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_reports_every_missing_field() {
    let app = TestApp::new();
    let registry = app.registry();

    let input = CreateVehicle {
        owner_name: String::new(),
        phone_number: "   ".to_string(),
        address: String::new(),
        vehicle_number: String::new(),
        permitted_route: String::new(),
        vehicle_type: None,
        organization: None,
        owner_image: None,
    };

    let err = registry.create(input).await.unwrap_err();
    let errors = match err {
        AppError::Validation(errors) => errors,
        other => panic!("expected a validation error, got {:?}", other),
    };

    let fields = errors.field_errors();
    for field in [
        "ownerName",
        "phoneNumber",
        "address",
        "vehicleNumber",
        "permittedRoute",
    ] {
        assert!(fields.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_failed_insert_rolls_back_uploaded_image() {
    let app = TestApp::new();
    let registry = app.registry();

    registry.create(create_input("DHK-1003")).await.unwrap();

    let mut duplicate = create_input("DHK-1003");
    duplicate.owner_image = Some(sample_image());
    let err = registry.create(duplicate).await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateVehicle(_)));

    // La imagen se subió antes del choque y tuvo que revertirse
    let uploads = app.assets.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(app.assets.deleted().await, vec![uploads[0].public_ref.clone()]);
}

#[tokio::test]
async fn test_create_stores_uploaded_image_url() {
    let app = TestApp::new();
    let registry = app.registry();

    let mut input = create_input("DHK-1004");
    input.owner_image = Some(sample_image());
    let vehicle = registry.create(input).await.unwrap();

    let uploads = app.assets.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(vehicle.owner_image.as_deref(), Some(uploads[0].url.as_str()));
}

#[tokio::test]
async fn test_update_attaches_token_to_legacy_rows() {
    let app = TestApp::new();
    let registry = app.registry();

    // Fila histórica sin token, como las migradas del sistema anterior
    let row = legacy_row("LEG-2001", Some("active"), None);
    let id = row.id;
    app.vehicles.insert_raw(row).await;

    let updated = registry.update(id, UpdateVehicle::default()).await.unwrap();

    let token = updated.lookup_token.expect("token missing after update");
    assert_eq!(
        decode_qr_data_uri(&token),
        format!("{}/vehicles/{}", BASE_URL, id)
    );
}

#[tokio::test]
async fn test_update_keeps_unsent_fields() {
    let app = TestApp::new();
    let registry = app.registry();

    let vehicle = registry.create(create_input("DHK-1005")).await.unwrap();

    let changes = UpdateVehicle {
        owner_name: Some("Rahim Mia".to_string()),
        ..Default::default()
    };
    let updated = registry.update(vehicle.id, changes).await.unwrap();

    assert_eq!(updated.owner_name, "Rahim Mia");
    assert_eq!(updated.phone_number, vehicle.phone_number);
    assert_eq!(updated.vehicle_number, vehicle.vehicle_number);
    assert_eq!(updated.permitted_route, vehicle.permitted_route);
}

#[tokio::test]
async fn test_update_missing_vehicle_is_not_found() {
    let app = TestApp::new();
    let registry = app.registry();

    let err = registry
        .update(Uuid::new_v4(), UpdateVehicle::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_set_status_flips_only_the_status() {
    let app = TestApp::new();
    let registry = app.registry();

    let vehicle = registry.create(create_input("DHK-1006")).await.unwrap();
    let updated = registry.set_status(vehicle.id, "inactive").await.unwrap();

    assert_eq!(updated.status, VehicleStatus::Inactive);
    assert_eq!(updated.owner_name, vehicle.owner_name);
    assert_eq!(updated.vehicle_number, vehicle.vehicle_number);
    assert_eq!(updated.lookup_token, vehicle.lookup_token);

    // El viaje de vuelta deja el registro byte a byte como estaba
    let restored = registry.set_status(vehicle.id, "active").await.unwrap();
    assert_eq!(restored, vehicle);
}

#[tokio::test]
async fn test_set_status_rejects_unknown_values() {
    let app = TestApp::new();
    let registry = app.registry();

    let vehicle = registry.create(create_input("DHK-1007")).await.unwrap();
    let err = registry.set_status(vehicle.id, "parked").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidStatus(_)));
}

#[tokio::test]
async fn test_set_all_status_counts_matched_and_modified() {
    let app = TestApp::new();
    let registry = app.registry();

    for number in ["DHK-1008", "DHK-1009", "DHK-1010"] {
        registry.create(create_input(number)).await.unwrap();
    }
    let listed = app.vehicles.find(&VehicleFilter::All, 0, 10).await.unwrap();
    registry.set_status(listed[0].id, "inactive").await.unwrap();

    let (status, outcome) = registry.set_all_status("inactive").await.unwrap();
    assert_eq!(status, VehicleStatus::Inactive);
    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.modified, 2);

    // Segunda pasada: todo coincide, nada cambia
    let (_, outcome) = registry.set_all_status("inactive").await.unwrap();
    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.modified, 0);
}

#[tokio::test]
async fn test_backfill_only_touches_rows_without_status() {
    let app = TestApp::new();
    let registry = app.registry();

    app.vehicles
        .insert_raw(legacy_row("LEG-2002", None, None))
        .await;
    app.vehicles
        .insert_raw(legacy_row("LEG-2003", Some(""), None))
        .await;
    registry.create(create_input("DHK-1011")).await.unwrap();

    let outcome = registry.backfill_status().await.unwrap();
    assert_eq!(outcome.matched, 2);
    assert_eq!(outcome.modified, 2);

    // Idempotente: la segunda pasada no encuentra filas pendientes
    let outcome = registry.backfill_status().await.unwrap();
    assert_eq!(outcome.matched, 0);
    assert_eq!(outcome.modified, 0);

    let all = app.vehicles.find(&VehicleFilter::All, 0, 10).await.unwrap();
    assert!(all.iter().all(|v| v.status == VehicleStatus::Active));
}

#[tokio::test]
async fn test_delete_removes_row_even_if_asset_host_fails() {
    let app = TestApp::new();
    let registry = app.registry();

    let mut input = create_input("DHK-1012");
    input.owner_image = Some(sample_image());
    let vehicle = registry.create(input).await.unwrap();

    app.assets.fail_deletes(true);
    registry.delete(vehicle.id).await.unwrap();

    assert!(app.vehicles.find_by_id(vehicle.id).await.unwrap().is_none());
    assert!(app.assets.delete_attempts() >= 1);
}

#[tokio::test]
async fn test_delete_skips_embedded_tokens() {
    let app = TestApp::new();
    let registry = app.registry();

    // Sin imagen y con token embebido: no hay nada que borrar fuera
    let vehicle = registry.create(create_input("DHK-1013")).await.unwrap();
    registry.delete(vehicle.id).await.unwrap();

    assert_eq!(app.assets.delete_attempts(), 0);
}

#[tokio::test]
async fn test_delete_discards_legacy_hosted_cards() {
    let app = TestApp::new();
    let registry = app.registry();

    let row = legacy_row(
        "LEG-2004",
        Some("active"),
        Some("https://assets.local/cards/oldcard123.png"),
    );
    let id = row.id;
    app.vehicles.insert_raw(row).await;

    registry.delete(id).await.unwrap();

    assert_eq!(app.assets.deleted().await, vec!["oldcard123".to_string()]);
}

#[tokio::test]
async fn test_delete_missing_vehicle_is_not_found() {
    let app = TestApp::new();
    let registry = app.registry();

    let err = registry.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
