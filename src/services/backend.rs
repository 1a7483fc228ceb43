//! Backend seam shared by the live API client and the mock service.
//!
//! The data-service facade routes through this trait so the backing
//! implementation can be swapped (or fallen back to) per call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::lead::{CreateLeadRequest, Lead};
use crate::domain::notification::Notification;
use crate::domain::property::{
    CreatePropertyRequest, Property, PropertyFilter, PropertyMedia, PropertyPage,
    UpdatePropertyRequest,
};
use crate::domain::stats::PropertyStats;
use crate::domain::trace::PropertyTrace;
use crate::error::ClientResult;

/// Health probe result; the facade annotates it with the active mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_properties(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage>;

    /// Absent listings resolve to `Ok(None)`; only transport or server
    /// failures produce an error.
    async fn get_property_by_id(&self, id: Uuid) -> ClientResult<Option<Property>>;

    async fn create_property(&self, req: &CreatePropertyRequest) -> ClientResult<Property>;
    async fn update_property(&self, id: Uuid, req: &UpdatePropertyRequest)
        -> ClientResult<Property>;
    async fn activate_property(&self, id: Uuid) -> ClientResult<Property>;
    async fn deactivate_property(&self, id: Uuid) -> ClientResult<Property>;
    async fn update_property_media(&self, id: Uuid, media: &PropertyMedia)
        -> ClientResult<Property>;

    async fn get_property_traces(&self, id: Uuid) -> ClientResult<Vec<PropertyTrace>>;
    async fn advanced_search(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage>;
    async fn get_property_stats(&self) -> ClientResult<PropertyStats>;

    async fn get_agents(&self) -> ClientResult<Vec<Agent>>;
    async fn get_agent_profile(&self, id: Uuid) -> ClientResult<Option<Agent>>;

    async fn create_lead(&self, req: &CreateLeadRequest) -> ClientResult<Lead>;
    async fn get_leads(&self) -> ClientResult<Vec<Lead>>;

    async fn get_notifications(&self) -> ClientResult<Vec<Notification>>;
    async fn mark_notification_read(&self, id: Uuid) -> ClientResult<()>;

    async fn health_check(&self) -> ClientResult<HealthReport>;
}
