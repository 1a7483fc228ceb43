//! Admin-surface domain types: webhooks, audit logs, uploads, bulk ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::property::PropertyStatus;

/// Registered outbound webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    pub id: Uuid,
    pub url: String,
    pub events: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWebhookRequest {
    pub url: String,
    pub events: Vec<String>,
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Audit query filter; only populated fields reach the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub actor: Option<String>,
    pub entity_type: Option<String>,
    pub limit: Option<u32>,
}

impl AuditQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.actor {
            pairs.push(("actor", v.clone()));
        }
        if let Some(v) = &self.entity_type {
            pairs.push(("entityType", v.clone()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        pairs
    }
}

/// Response to a multipart file upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Bulk status change over a set of listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusUpdateRequest {
    pub property_ids: Vec<Uuid>,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusUpdateResponse {
    pub updated: u64,
}
