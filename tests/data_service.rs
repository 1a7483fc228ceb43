//! Data-service facade tests: mode switching, offline fallback, and the
//! surfaces deliberately excluded from the fallback wrapper.

use std::sync::Arc;

use million_client::domain::property::PropertyFilter;
use million_client::services::{ApiClient, ConnectionStatus, DataService, MockApi};
use million_client::storage::{FavoritesStore, MemorySessionStore};
use million_client::DataMode;
use uuid::Uuid;

const DEAD_API: &str = "http://127.0.0.1:9/api";

fn dead_live_client() -> Arc<ApiClient> {
    let store = Arc::new(MemorySessionStore::new());
    Arc::new(ApiClient::new(DEAD_API, store, 2).unwrap())
}

fn facade(mode: DataMode, fallback: bool) -> DataService {
    DataService::from_parts(
        mode,
        dead_live_client(),
        Arc::new(MockApi::new()),
        fallback,
        FavoritesStore::in_memory(),
    )
}

#[tokio::test]
async fn live_failure_falls_back_to_mock_with_warning() {
    let service = facade(DataMode::Api, true);

    let resp = service
        .get_properties(&PropertyFilter::default())
        .await
        .expect("fallback should resolve, not reject");

    assert!(resp.warning.is_some());
    assert!(resp.is_degraded());
    assert!(!resp.data.items.is_empty());
}

#[tokio::test]
async fn fallback_disabled_propagates_the_live_error() {
    let service = facade(DataMode::Api, false);

    let result = service.get_properties(&PropertyFilter::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn mock_mode_does_not_warn() {
    let service = facade(DataMode::Mock, true);

    let resp = service.get_properties(&PropertyFilter::default()).await.unwrap();
    assert!(resp.warning.is_none());
    assert!(!resp.data.items.is_empty());
}

#[tokio::test]
async fn mock_mode_failure_is_not_retried_against_itself() {
    let service = facade(DataMode::Mock, true);

    // Unknown notification id: the mock itself errors and that error must
    // surface directly rather than looping through the fallback.
    let result = service.mark_notification_read(Uuid::new_v4()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn failing_fallback_surfaces_a_single_error() {
    let service = facade(DataMode::Api, true);

    // Live is unreachable and the mock has no such notification, so both
    // legs fail and the caller sees one combined error.
    let result = service.mark_notification_read(Uuid::new_v4()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn absent_property_resolves_to_none_in_mock_mode() {
    let service = facade(DataMode::Mock, true);

    let resp = service.get_property_by_id(Uuid::new_v4()).await.unwrap();
    assert!(resp.data.is_none());
    assert!(resp.warning.is_none());
}

#[tokio::test]
async fn health_check_is_annotated_with_mode() {
    let service = facade(DataMode::Mock, true);

    let report = service.health_check().await.unwrap();
    assert_eq!(report.mode.as_deref(), Some("mock"));
    assert_eq!(report.status, "ok");
}

#[tokio::test]
async fn mode_switch_changes_routing() {
    let service = facade(DataMode::Api, false);
    assert!(service.get_agents().await.is_err());

    service.use_mock();
    let agents = service.get_agents().await.unwrap().data;
    assert_eq!(agents.len(), 3);

    service.use_api();
    assert!(service.get_agents().await.is_err());
}

#[tokio::test]
async fn favorites_work_regardless_of_live_connectivity() {
    let service = facade(DataMode::Api, true);
    let id = Uuid::new_v4();

    assert!(service.toggle_favorite(id).unwrap());
    assert!(service.is_favorite(id));
    assert_eq!(service.favorites(), vec![id]);
    assert!(!service.toggle_favorite(id).unwrap());
}

#[tokio::test]
async fn connection_status_reflects_the_active_service() {
    let service = facade(DataMode::Mock, true);
    assert_eq!(service.connection_status().await, ConnectionStatus::Demo);

    service.use_api();
    assert_eq!(service.connection_status().await, ConnectionStatus::Offline);
}

#[tokio::test]
async fn status_toggle_round_trips_through_the_mock() {
    let service = facade(DataMode::Mock, true);
    let id = service.mock().property_ids().await[0];

    service.deactivate_property(id).await.unwrap();
    let after = service.get_property_by_id(id).await.unwrap().data.unwrap();
    assert_eq!(after.status.to_string(), "Inactive");

    service.activate_property(id).await.unwrap();
    let again = service.get_property_by_id(id).await.unwrap().data.unwrap();
    assert_eq!(again.status.to_string(), "Active");
}
