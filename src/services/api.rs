//! Typed client for the Million platform REST API.
//!
//! One method per backend endpoint. Every request carries a per-instance
//! correlation id for cross-service tracing and, when a session exists, a
//! bearer token from the session store. Non-2xx responses are parsed for
//! the server's `detail` message with an endpoint-specific fallback.

use reqwest::{multipart, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::domain::admin::{
    AuditLogEntry, AuditQuery, BulkStatusUpdateRequest, BulkStatusUpdateResponse,
    RegisterWebhookRequest, UploadResponse, Webhook,
};
use crate::domain::agent::{Agent, UpdateAgentProfileRequest};
use crate::domain::lead::{CreateLeadRequest, Lead};
use crate::domain::notification::Notification;
use crate::domain::property::{
    CreatePropertyRequest, Property, PropertyFilter, PropertyMedia, PropertyPage,
    UpdatePropertyRequest,
};
use crate::domain::stats::PropertyStats;
use crate::domain::trace::PropertyTrace;
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::services::backend::{Backend, HealthReport};
use crate::storage::SessionStore;

use async_trait::async_trait;

#[derive(Serialize)]
struct Empty {}

/// Live REST client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    correlation_id: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        store: Arc<dyn SessionStore>,
        timeout_seconds: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let correlation_id = Uuid::new_v4().to_string();
        tracing::info!(base_url = base_url, correlation_id = %correlation_id, "API client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            correlation_id,
            store,
        })
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header("X-Correlation-ID", &self.correlation_id);

        if let Some(session) = self.store.load() {
            req = req.bearer_auth(session.access_token);
        }
        req
    }

    async fn handle<R: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        default_msg: &str,
    ) -> ClientResult<R> {
        let response = req.send().await.map_err(|e| {
            error!(error = %e, "API request failed");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            response.json::<R>().await.map_err(|e| {
                error!(error = %e, "Failed to parse API response");
                ClientError::InvalidResponse(e.to_string())
            })
        } else {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            Err(ClientError::from_status(status.as_u16(), detail, default_msg))
        }
    }

    async fn handle_empty(&self, req: RequestBuilder, default_msg: &str) -> ClientResult<()> {
        let response = req.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            Err(ClientError::from_status(status.as_u16(), detail, default_msg))
        }
    }

    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        default_msg: &str,
    ) -> ClientResult<R> {
        debug!(path = path, "GET");
        let mut req = self.request(Method::GET, path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.handle(req, default_msg).await
    }

    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        default_msg: &str,
    ) -> ClientResult<R> {
        debug!(path = path, "POST");
        self.handle(self.request(Method::POST, path).json(body), default_msg)
            .await
    }

    async fn put<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        default_msg: &str,
    ) -> ClientResult<R> {
        debug!(path = path, "PUT");
        self.handle(self.request(Method::PUT, path).json(body), default_msg)
            .await
    }

    // =========================================================================
    // Properties (endpoints beyond the shared backend seam)
    // =========================================================================

    /// The delete endpoint exists on the backend but the dashboard never
    /// calls it; kept for API completeness.
    pub async fn delete_property(&self, id: Uuid) -> ClientResult<()> {
        self.handle_empty(
            self.request(Method::DELETE, &format!("/properties/{}", id)),
            "Failed to delete property",
        )
        .await
    }

    pub async fn reorder_media(&self, id: Uuid, media_ids: &[Uuid]) -> ClientResult<Property> {
        #[derive(Serialize)]
        struct Request<'a> {
            media_ids: &'a [Uuid],
        }
        self.post(
            &format!("/properties/{}/media/reorder", id),
            &Request { media_ids },
            "Failed to reorder media",
        )
        .await
    }

    pub async fn set_featured_media(&self, id: Uuid, media_id: Uuid) -> ClientResult<Property> {
        self.post(
            &format!("/properties/{}/media/{}/feature", id, media_id),
            &Empty {},
            "Failed to feature media",
        )
        .await
    }

    pub async fn set_media_enabled(
        &self,
        id: Uuid,
        media_id: Uuid,
        enabled: bool,
    ) -> ClientResult<Property> {
        #[derive(Serialize)]
        struct Request {
            enabled: bool,
        }
        self.post(
            &format!("/properties/{}/media/{}/enable", id, media_id),
            &Request { enabled },
            "Failed to update media visibility",
        )
        .await
    }

    // =========================================================================
    // Owners / agents
    // =========================================================================

    /// Profile of the signed-in agent.
    pub async fn get_my_profile(&self) -> ClientResult<Agent> {
        self.get("/owners/profile", &[], "Failed to fetch profile").await
    }

    /// Profile update; the backend is still rolling this endpoint out, so a
    /// 404 surfaces as a NotFound error rather than being masked.
    pub async fn update_agent_profile(
        &self,
        id: Uuid,
        req: &UpdateAgentProfileRequest,
    ) -> ClientResult<Agent> {
        self.put(
            &format!("/owners/{}/agent-profile", id),
            req,
            "Failed to update agent profile",
        )
        .await
    }

    // =========================================================================
    // Webhooks, audit, uploads, bulk ops
    // =========================================================================

    pub async fn register_webhook(&self, req: &RegisterWebhookRequest) -> ClientResult<Webhook> {
        self.post("/webhooks", req, "Failed to register webhook").await
    }

    pub async fn list_webhooks(&self) -> ClientResult<Vec<Webhook>> {
        self.get("/webhooks", &[], "Failed to fetch webhooks").await
    }

    pub async fn get_audit_logs(&self, query: &AuditQuery) -> ClientResult<Vec<AuditLogEntry>> {
        self.get("/audit/logs", &query.to_query_pairs(), "Failed to fetch audit logs")
            .await
    }

    #[instrument(skip(self, bytes))]
    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResponse> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let req = self.request(Method::POST, "/upload").multipart(form);
        self.handle(req, "Failed to upload file").await
    }

    pub async fn bulk_update_status(
        &self,
        req: &BulkStatusUpdateRequest,
    ) -> ClientResult<BulkStatusUpdateResponse> {
        self.post("/properties/bulk/status", req, "Failed to bulk-update properties")
            .await
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn get_properties(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage> {
        self.get("/properties", &filter.to_query_pairs(), "Failed to fetch properties")
            .await
    }

    /// 404 means "no such listing", a valid absent result.
    async fn get_property_by_id(&self, id: Uuid) -> ClientResult<Option<Property>> {
        let req = self.request(Method::GET, &format!("/properties/{}", id));
        let response = req.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            let property = response
                .json::<Property>()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            Ok(Some(property))
        } else {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Failed to fetch property",
            ))
        }
    }

    async fn create_property(&self, req: &CreatePropertyRequest) -> ClientResult<Property> {
        self.post("/properties", req, "Failed to create property").await
    }

    async fn update_property(
        &self,
        id: Uuid,
        req: &UpdatePropertyRequest,
    ) -> ClientResult<Property> {
        self.put(&format!("/properties/{}", id), req, "Failed to update property")
            .await
    }

    async fn activate_property(&self, id: Uuid) -> ClientResult<Property> {
        self.post(
            &format!("/properties/{}/activate", id),
            &Empty {},
            "Failed to activate property",
        )
        .await
    }

    async fn deactivate_property(&self, id: Uuid) -> ClientResult<Property> {
        self.post(
            &format!("/properties/{}/deactivate", id),
            &Empty {},
            "Failed to deactivate property",
        )
        .await
    }

    async fn update_property_media(
        &self,
        id: Uuid,
        media: &PropertyMedia,
    ) -> ClientResult<Property> {
        self.put(
            &format!("/properties/{}/media", id),
            media,
            "Failed to update property media",
        )
        .await
    }

    async fn get_property_traces(&self, id: Uuid) -> ClientResult<Vec<PropertyTrace>> {
        self.get(
            &format!("/properties/{}/traces", id),
            &[],
            "Failed to fetch property traces",
        )
        .await
    }

    async fn advanced_search(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage> {
        self.post("/properties/search", filter, "Search failed").await
    }

    async fn get_property_stats(&self) -> ClientResult<PropertyStats> {
        self.get("/stats/properties", &[], "Failed to fetch property stats")
            .await
    }

    async fn get_agents(&self) -> ClientResult<Vec<Agent>> {
        self.get("/owners", &[], "Failed to fetch agents").await
    }

    async fn get_agent_profile(&self, id: Uuid) -> ClientResult<Option<Agent>> {
        let req = self.request(Method::GET, &format!("/owners/{}/agent-profile", id));
        let response = req.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            let agent = response
                .json::<Agent>()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            Ok(Some(agent))
        } else {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Failed to fetch agent profile",
            ))
        }
    }

    async fn create_lead(&self, req: &CreateLeadRequest) -> ClientResult<Lead> {
        self.post("/leads", req, "Failed to submit contact request").await
    }

    async fn get_leads(&self) -> ClientResult<Vec<Lead>> {
        self.get("/leads", &[], "Failed to fetch leads").await
    }

    async fn get_notifications(&self) -> ClientResult<Vec<Notification>> {
        self.get("/notifications", &[], "Failed to fetch notifications")
            .await
    }

    async fn mark_notification_read(&self, id: Uuid) -> ClientResult<()> {
        self.handle_empty(
            self.request(Method::POST, &format!("/notifications/{}/read", id)),
            "Failed to mark notification as read",
        )
        .await
    }

    async fn health_check(&self) -> ClientResult<HealthReport> {
        self.get("/health", &[], "Health check failed").await
    }
}
