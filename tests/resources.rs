//! Resource-controller tests against the mock backend: pagination
//! semantics, status mutations with forced re-fetch, and the
//! never-propagate error policy.

use std::sync::Arc;

use million_client::domain::property::{PropertyFilter, PropertyStatus};
use million_client::resources::{
    AgentsController, PropertiesController, PropertyController, StatsController,
    TracesController,
};
use million_client::services::{ApiClient, DataService, MockApi};
use million_client::storage::{FavoritesStore, MemorySessionStore};
use million_client::DataMode;
use uuid::Uuid;

const DEAD_API: &str = "http://127.0.0.1:9/api";

fn mock_service() -> Arc<DataService> {
    let store = Arc::new(MemorySessionStore::new());
    let live = Arc::new(ApiClient::new(DEAD_API, store, 2).unwrap());
    Arc::new(DataService::from_parts(
        DataMode::Mock,
        live,
        Arc::new(MockApi::new()),
        false,
        FavoritesStore::in_memory(),
    ))
}

#[tokio::test]
async fn refresh_loads_the_first_page() {
    let controller = PropertiesController::new(mock_service(), 4);
    controller.refresh().await;

    let snap = controller.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.is_none());
    assert_eq!(snap.properties.len(), 4);
    assert_eq!(snap.current_page, 1);
    assert_eq!(snap.total, 15);
    assert_eq!(snap.total_pages, 4); // ceil(15 / 4)
}

#[tokio::test]
async fn load_more_appends_and_increments_the_page() {
    let controller = PropertiesController::new(mock_service(), 4);
    controller.refresh().await;

    let before = controller.snapshot();
    controller.load_more().await;
    let after = controller.snapshot();

    assert_eq!(after.current_page, before.current_page + 1);
    assert_eq!(after.properties.len(), before.properties.len() + 4);
    // Appended, not replaced: the first page is still at the front.
    assert_eq!(after.properties[0].id, before.properties[0].id);
}

#[tokio::test]
async fn load_more_at_the_last_page_is_a_noop() {
    let controller = PropertiesController::new(mock_service(), 8);
    controller.refresh().await;
    controller.load_more().await; // page 2 of 2 (15 items)

    let at_end = controller.snapshot();
    assert_eq!(at_end.current_page, at_end.total_pages);
    assert_eq!(at_end.properties.len(), 15);

    controller.load_more().await;
    let unchanged = controller.snapshot();
    assert_eq!(unchanged.current_page, at_end.current_page);
    assert_eq!(unchanged.properties.len(), at_end.properties.len());
}

#[tokio::test]
async fn load_more_before_the_first_fetch_is_a_noop() {
    let controller = PropertiesController::new(mock_service(), 4);
    controller.load_more().await;

    let snap = controller.snapshot();
    assert!(snap.properties.is_empty());
    assert_eq!(snap.current_page, 0);
}

#[tokio::test]
async fn deactivate_re_fetches_and_shows_the_new_status() {
    let service = mock_service();
    let id = service.mock().property_ids().await[0];

    let controller = PropertiesController::new(service, 20);
    controller.refresh().await;

    let before = controller.snapshot();
    let listed = before.properties.iter().find(|p| p.id == id).unwrap();
    assert_eq!(listed.status, PropertyStatus::Active);

    controller.deactivate_property(id).await;

    let after = controller.snapshot();
    let listed = after.properties.iter().find(|p| p.id == id).unwrap();
    assert_eq!(listed.status, PropertyStatus::Inactive);
    assert!(after.error.is_none());
}

#[tokio::test]
async fn mutation_refresh_supersedes_an_in_flight_fetch() {
    // A bound but never-accepted listener keeps the live request hanging
    // until the client timeout, so the first refresh stays in flight.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let stalled = format!("http://{}/api", listener.local_addr().unwrap());

    let store = Arc::new(MemorySessionStore::new());
    let live = Arc::new(ApiClient::new(&stalled, store, 2).unwrap());
    let service = Arc::new(DataService::from_parts(
        DataMode::Api,
        live,
        Arc::new(MockApi::new()),
        false,
        FavoritesStore::in_memory(),
    ));
    let id = service.mock().property_ids().await[0];

    let controller = Arc::new(PropertiesController::new(service.clone(), 20));
    let hung = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(controller.snapshot().loading);

    // Mutate against demo data while the live fetch is still hanging. The
    // forced re-fetch must run, not be dropped by the in-flight gate.
    service.use_mock();
    controller.deactivate_property(id).await;

    let snap = controller.snapshot();
    let listed = snap.properties.iter().find(|p| p.id == id).unwrap();
    assert_eq!(listed.status, PropertyStatus::Inactive);
    assert!(snap.error.is_none());

    // When the superseded fetch finally fails, its outcome is discarded
    // rather than overwriting the newer state.
    hung.await.unwrap();
    let after = controller.snapshot();
    assert!(!after.loading);
    assert!(after.error.is_none());
    let listed = after.properties.iter().find(|p| p.id == id).unwrap();
    assert_eq!(listed.status, PropertyStatus::Inactive);
}

#[tokio::test]
async fn advanced_search_filters_by_city() {
    let controller = PropertiesController::new(mock_service(), 20);
    controller
        .advanced_search(PropertyFilter {
            city: Some("Miami".into()),
            ..Default::default()
        })
        .await;

    let snap = controller.snapshot();
    assert!(!snap.properties.is_empty());
    assert!(snap.properties.iter().all(|p| p.city == "Miami"));
}

#[tokio::test]
async fn errors_land_in_the_snapshot_not_the_caller() {
    // Live mode without fallback against a dead endpoint.
    let store = Arc::new(MemorySessionStore::new());
    let live = Arc::new(ApiClient::new(DEAD_API, store, 2).unwrap());
    let service = Arc::new(DataService::from_parts(
        DataMode::Api,
        live,
        Arc::new(MockApi::new()),
        false,
        FavoritesStore::in_memory(),
    ));

    let controller = PropertiesController::new(service, 4);
    controller.refresh().await;

    let snap = controller.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.is_some());
    assert!(snap.properties.is_empty());
}

#[tokio::test]
async fn property_controller_treats_missing_as_absent() {
    let controller = PropertyController::new(mock_service());
    controller.load(Uuid::new_v4()).await;

    let snap = controller.snapshot();
    assert!(!snap.loading);
    assert!(snap.property.is_none());
    assert!(snap.error.is_none());
}

#[tokio::test]
async fn property_controller_loads_and_refreshes() {
    let service = mock_service();
    let id = service.mock().property_ids().await[2];

    let controller = PropertyController::new(service);
    controller.load(id).await;
    assert_eq!(controller.snapshot().property.unwrap().id, id);

    controller.refresh().await;
    assert_eq!(controller.snapshot().property.unwrap().id, id);
}

#[tokio::test]
async fn traces_are_scoped_to_the_listing() {
    let service = mock_service();
    let ids = service.mock().property_ids().await;

    let controller = TracesController::new(service);
    // The seed records one sale on the fifth listing.
    controller.load(ids[4]).await;
    let traced = controller.snapshot();
    assert_eq!(traced.traces.len(), 1);
    assert_eq!(traced.traces[0].property_id, ids[4]);

    controller.load(ids[0]).await;
    assert!(controller.snapshot().traces.is_empty());
}

#[tokio::test]
async fn stats_reflect_the_seeded_statuses() {
    let controller = StatsController::new(mock_service());
    controller.refresh().await;

    let stats = controller.snapshot().stats.unwrap();
    assert_eq!(stats.total, 15);
    assert_eq!(
        stats.active + stats.inactive + stats.sold + stats.pending,
        stats.total
    );
    assert!(stats.average_price > 0);
}

#[tokio::test]
async fn agents_controller_loads_the_roster() {
    let controller = AgentsController::new(mock_service());
    controller.refresh().await;

    let snap = controller.snapshot();
    assert_eq!(snap.agents.len(), 3);
    assert!(snap.error.is_none());

    let first = snap.agents[0].id;
    assert!(controller.agent(first).is_some());
    assert!(controller.agent(Uuid::new_v4()).is_none());
}
