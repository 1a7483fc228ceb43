//! Data-service facade: mock/live switch with offline fallback.
//!
//! Presents one interface to the resource controllers while the backing
//! service stays swappable. The facade owns no data of its own; it routes.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{DataMode, Settings};
use crate::domain::agent::Agent;
use crate::domain::lead::{CreateLeadRequest, Lead};
use crate::domain::notification::Notification;
use crate::domain::property::{
    CreatePropertyRequest, Property, PropertyFilter, PropertyMedia, PropertyPage,
    UpdatePropertyRequest,
};
use crate::domain::stats::PropertyStats;
use crate::domain::trace::PropertyTrace;
use crate::error::{ClientError, ClientResult};
use crate::services::api::ApiClient;
use crate::services::backend::{Backend, HealthReport};
use crate::services::mock::MockApi;
use crate::storage::{FavoritesStore, SessionStore};

/// Result of a facade call. When the live API failed and the mock stepped
/// in, `warning` carries a non-fatal advisory for the UI banner; the call
/// itself still succeeds.
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    pub data: T,
    pub warning: Option<String>,
}

impl<T> ServiceResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            data,
            warning: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Reported connectivity, always derived from the active service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Offline,
    Demo,
}

pub struct DataService {
    mode: RwLock<DataMode>,
    live: Arc<ApiClient>,
    mock: Arc<MockApi>,
    fallback_enabled: bool,
    favorites: FavoritesStore,
}

impl DataService {
    pub fn new(settings: &Settings, store: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let live = Arc::new(ApiClient::new(
            &settings.api_base_url,
            store,
            settings.http_timeout_seconds,
        )?);
        let favorites = FavoritesStore::new(&settings.storage_dir)
            .map_err(|e| anyhow::anyhow!("favorites store: {}", e))?;

        Ok(Self::from_parts(
            settings.data_mode,
            live,
            Arc::new(MockApi::new()),
            settings.fallback_to_mock,
            favorites,
        ))
    }

    /// Assembles a facade from pre-built parts. The seam tests use.
    pub fn from_parts(
        mode: DataMode,
        live: Arc<ApiClient>,
        mock: Arc<MockApi>,
        fallback_enabled: bool,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            mode: RwLock::new(mode),
            live,
            mock,
            fallback_enabled,
            favorites,
        }
    }

    pub fn mode(&self) -> DataMode {
        *self.mode.read()
    }

    pub fn set_mode(&self, mode: DataMode) {
        debug!(mode = mode.as_str(), "Data mode switched");
        *self.mode.write() = mode;
    }

    pub fn use_mock(&self) {
        self.set_mode(DataMode::Mock);
    }

    pub fn use_api(&self) {
        self.set_mode(DataMode::Api);
    }

    pub fn live(&self) -> &Arc<ApiClient> {
        &self.live
    }

    pub fn mock(&self) -> &Arc<MockApi> {
        &self.mock
    }

    fn active(&self) -> Arc<dyn Backend> {
        match self.mode() {
            DataMode::Mock => self.mock.clone(),
            // Hybrid is declared but routes like the live mode.
            DataMode::Api | DataMode::Hybrid => self.live.clone(),
        }
    }

    /// Runs the operation against the active backend. On failure, when
    /// fallback is enabled and the active mode is not already mock, the same
    /// logical operation is retried against the mock service and the result
    /// carries an advisory warning instead of an error. A mock-side failure
    /// surfaces both errors as one.
    async fn with_fallback<T, F>(&self, op: F) -> ClientResult<ServiceResponse<T>>
    where
        T: Send + 'static,
        F: Fn(Arc<dyn Backend>) -> BoxFuture<'static, ClientResult<T>>,
    {
        let mode = self.mode();
        match op(self.active()).await {
            Ok(data) => Ok(ServiceResponse::ok(data)),
            Err(primary_err) => {
                if !self.fallback_enabled || mode == DataMode::Mock {
                    return Err(primary_err);
                }
                warn!(error = %primary_err, "Live API call failed, falling back to demo data");
                match op(self.mock.clone()).await {
                    Ok(data) => Ok(ServiceResponse {
                        data,
                        warning: Some(format!(
                            "Live API unavailable, showing demo data ({})",
                            primary_err
                        )),
                    }),
                    Err(mock_err) => Err(ClientError::Internal(anyhow::anyhow!(
                        "live request failed ({}); mock fallback also failed ({})",
                        primary_err,
                        mock_err
                    ))),
                }
            }
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub async fn get_properties(
        &self,
        filter: &PropertyFilter,
    ) -> ClientResult<ServiceResponse<PropertyPage>> {
        let filter = filter.clone();
        self.with_fallback(move |b| {
            let filter = filter.clone();
            async move { b.get_properties(&filter).await }.boxed()
        })
        .await
    }

    pub async fn get_property_by_id(
        &self,
        id: Uuid,
    ) -> ClientResult<ServiceResponse<Option<Property>>> {
        self.with_fallback(move |b| async move { b.get_property_by_id(id).await }.boxed())
            .await
    }

    pub async fn create_property(
        &self,
        req: &CreatePropertyRequest,
    ) -> ClientResult<ServiceResponse<Property>> {
        let req = req.clone();
        self.with_fallback(move |b| {
            let req = req.clone();
            async move { b.create_property(&req).await }.boxed()
        })
        .await
    }

    pub async fn update_property(
        &self,
        id: Uuid,
        req: &UpdatePropertyRequest,
    ) -> ClientResult<ServiceResponse<Property>> {
        let req = req.clone();
        self.with_fallback(move |b| {
            let req = req.clone();
            async move { b.update_property(id, &req).await }.boxed()
        })
        .await
    }

    pub async fn activate_property(&self, id: Uuid) -> ClientResult<ServiceResponse<Property>> {
        self.with_fallback(move |b| async move { b.activate_property(id).await }.boxed())
            .await
    }

    pub async fn deactivate_property(&self, id: Uuid) -> ClientResult<ServiceResponse<Property>> {
        self.with_fallback(move |b| async move { b.deactivate_property(id).await }.boxed())
            .await
    }

    pub async fn update_property_media(
        &self,
        id: Uuid,
        media: &PropertyMedia,
    ) -> ClientResult<ServiceResponse<Property>> {
        let media = media.clone();
        self.with_fallback(move |b| {
            let media = media.clone();
            async move { b.update_property_media(id, &media).await }.boxed()
        })
        .await
    }

    pub async fn get_property_traces(
        &self,
        id: Uuid,
    ) -> ClientResult<ServiceResponse<Vec<PropertyTrace>>> {
        self.with_fallback(move |b| async move { b.get_property_traces(id).await }.boxed())
            .await
    }

    pub async fn advanced_search(
        &self,
        filter: &PropertyFilter,
    ) -> ClientResult<ServiceResponse<PropertyPage>> {
        let filter = filter.clone();
        self.with_fallback(move |b| {
            let filter = filter.clone();
            async move { b.advanced_search(&filter).await }.boxed()
        })
        .await
    }

    pub async fn get_property_stats(&self) -> ClientResult<ServiceResponse<PropertyStats>> {
        self.with_fallback(move |b| async move { b.get_property_stats().await }.boxed())
            .await
    }

    // =========================================================================
    // Agents, leads, notifications
    // =========================================================================

    pub async fn get_agents(&self) -> ClientResult<ServiceResponse<Vec<Agent>>> {
        self.with_fallback(move |b| async move { b.get_agents().await }.boxed())
            .await
    }

    pub async fn get_agent_profile(
        &self,
        id: Uuid,
    ) -> ClientResult<ServiceResponse<Option<Agent>>> {
        self.with_fallback(move |b| async move { b.get_agent_profile(id).await }.boxed())
            .await
    }

    pub async fn create_lead(
        &self,
        req: &CreateLeadRequest,
    ) -> ClientResult<ServiceResponse<Lead>> {
        let req = req.clone();
        self.with_fallback(move |b| {
            let req = req.clone();
            async move { b.create_lead(&req).await }.boxed()
        })
        .await
    }

    pub async fn get_leads(&self) -> ClientResult<ServiceResponse<Vec<Lead>>> {
        self.with_fallback(move |b| async move { b.get_leads().await }.boxed())
            .await
    }

    pub async fn get_notifications(&self) -> ClientResult<ServiceResponse<Vec<Notification>>> {
        self.with_fallback(move |b| async move { b.get_notifications().await }.boxed())
            .await
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> ClientResult<ServiceResponse<()>> {
        self.with_fallback(move |b| async move { b.mark_notification_read(id).await }.boxed())
            .await
    }

    // =========================================================================
    // Favorites and connectivity: never routed through the fallback wrapper.
    // They reflect local state of the active service only.
    // =========================================================================

    pub fn favorites(&self) -> Vec<Uuid> {
        self.favorites.all()
    }

    pub fn is_favorite(&self, id: Uuid) -> bool {
        self.favorites.contains(id)
    }

    pub fn toggle_favorite(&self, id: Uuid) -> ClientResult<bool> {
        self.favorites.toggle(id)
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        match self.mode() {
            DataMode::Mock => ConnectionStatus::Demo,
            DataMode::Api | DataMode::Hybrid => match self.live.health_check().await {
                Ok(_) => ConnectionStatus::Connected,
                Err(_) => ConnectionStatus::Offline,
            },
        }
    }

    /// Active backend's health report, annotated with the current mode.
    pub async fn health_check(&self) -> ClientResult<HealthReport> {
        let mut report = self.active().health_check().await?;
        report.mode = Some(self.mode().as_str().to_string());
        Ok(report)
    }
}
