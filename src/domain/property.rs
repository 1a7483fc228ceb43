//! Property domain types
//!
//! Listings are created through the create call and mutated through
//! update/activate/deactivate/media calls; the client never hard-deletes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyStatus {
    Active,
    Inactive,
    Sold,
    Pending,
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Sold => "Sold",
            Self::Pending => "Pending",
        };
        write!(f, "{}", s)
    }
}

/// A single gallery item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: Uuid,
    pub url: String,
    pub featured: bool,
    pub enabled: bool,
    pub position: u32,
}

/// Cover image plus ordered gallery.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyMedia {
    pub cover_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<MediaItem>,
}

/// Property entity as consumed from the listings API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub size_sqm: f64,
    pub property_type: String,
    pub status: PropertyStatus,
    #[serde(default)]
    pub media: PropertyMedia,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub size_sqm: f64,
    pub property_type: String,
    pub owner_id: Uuid,
}

/// Partial update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePropertyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_sqm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
}

/// Listing query filter. Only populated fields are serialized into the
/// query string; omitted filters never appear.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub status: Option<PropertyStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PropertyFilter {
    /// Serializes the defined fields into query pairs, in a fixed order so
    /// the same filter always produces the same query string.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.city {
            pairs.push(("city", v.clone()));
        }
        if let Some(v) = &self.neighborhood {
            pairs.push(("neighborhood", v.clone()));
        }
        if let Some(v) = self.min_price {
            pairs.push(("minPrice", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = self.bedrooms {
            pairs.push(("bedrooms", v.to_string()));
        }
        if let Some(v) = self.bathrooms {
            pairs.push(("bathrooms", v.to_string()));
        }
        if let Some(v) = &self.property_type {
            pairs.push(("propertyType", v.clone()));
        }
        if let Some(v) = self.status {
            pairs.push(("status", v.to_string()));
        }
        if let Some(v) = &self.search {
            pairs.push(("search", v.clone()));
        }
        if let Some(v) = self.page {
            pairs.push(("page", v.to_string()));
        }
        if let Some(v) = self.page_size {
            pairs.push(("pageSize", v.to_string()));
        }
        pairs
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

/// One page of listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl PropertyPage {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        ((self.total as f64) / (self.page_size as f64)).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_serialization_is_idempotent() {
        let filter = PropertyFilter {
            city: Some("Miami".into()),
            min_price: Some(1_000_000),
            bedrooms: Some(4),
            status: Some(PropertyStatus::Active),
            ..Default::default()
        };

        let first = filter.to_query_pairs();
        let second = filter.to_query_pairs();
        assert_eq!(first, second);
    }

    #[test]
    fn omitted_filter_fields_never_appear() {
        let filter = PropertyFilter {
            city: Some("Miami".into()),
            ..Default::default()
        };

        let pairs = filter.to_query_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "city");
        assert!(pairs.iter().all(|(k, _)| *k != "minPrice" && *k != "status"));
    }

    #[test]
    fn empty_filter_produces_no_pairs() {
        assert!(PropertyFilter::default().to_query_pairs().is_empty());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PropertyPage {
            items: vec![],
            total: 25,
            page: 1,
            page_size: 12,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
