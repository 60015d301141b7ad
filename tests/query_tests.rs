//! Pruebas del listado paginado y la búsqueda

mod common;

use common::TestApp;
use vehicle_registry::models::vehicle::NewVehicle;
use vehicle_registry::repositories::VehicleRepository;
use vehicle_registry::services::query_service::QueryService;

fn new_vehicle(number: &str) -> NewVehicle {
    NewVehicle {
        owner_name: "Karim Uddin".to_string(),
        phone_number: "01712345678".to_string(),
        address: "12 Station Road".to_string(),
        vehicle_number: number.to_string(),
        permitted_route: "Airport - Station".to_string(),
        owner_image: None,
        vehicle_type: None,
        organization: None,
    }
}

fn query(app: &TestApp) -> QueryService {
    QueryService::new(app.vehicles.clone())
}

#[tokio::test]
async fn test_list_paginates_with_stable_totals() {
    let app = TestApp::new();
    for index in 0..25 {
        app.vehicles
            .insert(new_vehicle(&format!("DHK-4{:03}", index)))
            .await
            .unwrap();
    }

    let first = query(&app).list(1, 10, "").await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.page, 1);
    assert_eq!(first.page_size, 10);

    let second = query(&app).list(2, 10, "").await.unwrap();
    assert_eq!(second.items.len(), 10);

    let last = query(&app).list(3, 10, "").await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.total, 25);

    // Las dos primeras páginas no comparten registros
    let mut seen: std::collections::HashSet<uuid::Uuid> = std::collections::HashSet::new();
    for vehicle in first.items.iter().chain(second.items.iter()) {
        assert!(seen.insert(vehicle.id), "page overlap at {}", vehicle.id);
    }
    assert_eq!(seen.len(), 20);
}

#[tokio::test]
async fn test_list_beyond_last_page_is_empty() {
    let app = TestApp::new();
    for index in 0..25 {
        app.vehicles
            .insert(new_vehicle(&format!("DHK-5{:03}", index)))
            .await
            .unwrap();
    }

    let page = query(&app).list(9, 10, "").await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn test_list_survives_extreme_page_numbers() {
    let app = TestApp::new();
    app.vehicles.insert(new_vehicle("DHK-5900")).await.unwrap();

    // El offset no debe desbordar por grande que venga la página
    let page = query(&app).list(i64::MAX, 10, "").await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_empty_registry_has_zero_pages() {
    let app = TestApp::new();

    let page = query(&app).list(1, 10, "").await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_search_matches_any_field_case_insensitively() {
    let app = TestApp::new();

    app.vehicles.insert(new_vehicle("DHK-6001")).await.unwrap();

    let mut with_org = new_vehicle("DHK-6002");
    with_org.owner_name = "Rahim Mia".to_string();
    with_org.phone_number = "01898765432".to_string();
    with_org.organization = Some("City Transport Union".to_string());
    app.vehicles.insert(with_org).await.unwrap();

    let mut lake_route = new_vehicle("DHK-6003");
    lake_route.owner_name = "Salma Begum".to_string();
    lake_route.phone_number = "01551234567".to_string();
    lake_route.permitted_route = "Lake - Terminal".to_string();
    app.vehicles.insert(lake_route).await.unwrap();

    let by_owner = query(&app).list(1, 10, "KARIM").await.unwrap();
    assert_eq!(by_owner.total, 1);
    assert_eq!(by_owner.items[0].vehicle_number, "DHK-6001");

    let by_organization = query(&app).list(1, 10, "transport").await.unwrap();
    assert_eq!(by_organization.total, 1);
    assert_eq!(by_organization.items[0].vehicle_number, "DHK-6002");

    let by_route = query(&app).list(1, 10, "lake").await.unwrap();
    assert_eq!(by_route.total, 1);
    assert_eq!(by_route.items[0].vehicle_number, "DHK-6003");

    let by_phone = query(&app).list(1, 10, "01898").await.unwrap();
    assert_eq!(by_phone.total, 1);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new();

    app.vehicles.insert(new_vehicle("DHK-50%")).await.unwrap();
    app.vehicles.insert(new_vehicle("DHK-500")).await.unwrap();

    let page = query(&app).list(1, 10, "50%").await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].vehicle_number, "DHK-50%");
}

#[tokio::test]
async fn test_blank_search_lists_everything() {
    let app = TestApp::new();

    app.vehicles.insert(new_vehicle("DHK-7001")).await.unwrap();
    app.vehicles.insert(new_vehicle("DHK-7002")).await.unwrap();

    let page = query(&app).list(1, 10, "   ").await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
}
