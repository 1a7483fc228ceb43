//! In-memory mock backend
//!
//! Seeded demo dataset with the same operation semantics as the live API:
//! absent listings resolve to `None`, traces are append-only, stats are
//! derived from the current listing set. Used for demo mode and as the
//! offline fallback target.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentStats};
use crate::domain::lead::{CreateLeadRequest, Lead, LeadStatus};
use crate::domain::notification::{Notification, NotificationType};
use crate::domain::property::{
    CreatePropertyRequest, MediaItem, Property, PropertyFilter, PropertyMedia, PropertyPage,
    PropertyStatus, UpdatePropertyRequest,
};
use crate::domain::stats::PropertyStats;
use crate::domain::trace::PropertyTrace;
use crate::error::{ClientError, ClientResult};
use crate::services::backend::{Backend, HealthReport};

struct MockState {
    properties: Vec<Property>,
    agents: Vec<Agent>,
    traces: Vec<PropertyTrace>,
    leads: Vec<Lead>,
    notifications: Vec<Notification>,
}

pub struct MockApi {
    state: RwLock<MockState>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(seed()),
        }
    }

    /// Ids of the seeded listings, in listing order. Handy for demos/tests.
    pub async fn property_ids(&self) -> Vec<Uuid> {
        self.state.read().await.properties.iter().map(|p| p.id).collect()
    }

    async fn set_status(&self, id: Uuid, status: PropertyStatus) -> ClientResult<Property> {
        let mut state = self.state.write().await;
        let property = state
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found("Property not found"))?;
        property.status = status;
        property.updated_at = Utc::now();
        Ok(property.clone())
    }
}

fn matches(p: &Property, f: &PropertyFilter) -> bool {
    if let Some(city) = &f.city {
        if !p.city.eq_ignore_ascii_case(city) {
            return false;
        }
    }
    if let Some(n) = &f.neighborhood {
        match &p.neighborhood {
            Some(pn) if pn.eq_ignore_ascii_case(n) => {}
            _ => return false,
        }
    }
    if let Some(min) = f.min_price {
        if p.price < min {
            return false;
        }
    }
    if let Some(max) = f.max_price {
        if p.price > max {
            return false;
        }
    }
    if let Some(b) = f.bedrooms {
        if p.bedrooms < b {
            return false;
        }
    }
    if let Some(b) = f.bathrooms {
        if p.bathrooms < b {
            return false;
        }
    }
    if let Some(t) = &f.property_type {
        if !p.property_type.eq_ignore_ascii_case(t) {
            return false;
        }
    }
    if let Some(s) = f.status {
        if p.status != s {
            return false;
        }
    }
    if let Some(q) = &f.search {
        let q = q.to_lowercase();
        if !p.name.to_lowercase().contains(&q) && !p.address.to_lowercase().contains(&q) {
            return false;
        }
    }
    true
}

fn paginate(items: Vec<Property>, filter: &PropertyFilter) -> PropertyPage {
    let page = filter.page.unwrap_or(1).max(1);
    let page_size = filter.page_size.unwrap_or(12).max(1);
    let total = items.len() as u64;

    let start = ((page - 1) * page_size) as usize;
    let slice = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    PropertyPage {
        items: slice,
        total,
        page,
        page_size,
    }
}

#[async_trait]
impl Backend for MockApi {
    async fn get_properties(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage> {
        let state = self.state.read().await;
        let filtered: Vec<Property> = state
            .properties
            .iter()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect();
        Ok(paginate(filtered, filter))
    }

    async fn get_property_by_id(&self, id: Uuid) -> ClientResult<Option<Property>> {
        let state = self.state.read().await;
        Ok(state.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn create_property(&self, req: &CreatePropertyRequest) -> ClientResult<Property> {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            address: req.address.clone(),
            city: req.city.clone(),
            neighborhood: req.neighborhood.clone(),
            price: req.price,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            size_sqm: req.size_sqm,
            property_type: req.property_type.clone(),
            status: PropertyStatus::Pending,
            media: PropertyMedia::default(),
            owner_id: req.owner_id,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.write().await;
        state.traces.push(PropertyTrace {
            id: Uuid::new_v4(),
            property_id: property.id,
            name: "Listed".into(),
            value: property.price,
            tax: 0,
            date_sale: now,
        });
        state.properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(
        &self,
        id: Uuid,
        req: &UpdatePropertyRequest,
    ) -> ClientResult<Property> {
        let mut state = self.state.write().await;
        let property = state
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found("Property not found"))?;

        if let Some(v) = &req.name {
            property.name = v.clone();
        }
        if let Some(v) = &req.address {
            property.address = v.clone();
        }
        if let Some(v) = &req.city {
            property.city = v.clone();
        }
        if let Some(v) = &req.neighborhood {
            property.neighborhood = Some(v.clone());
        }
        if let Some(v) = req.price {
            property.price = v;
        }
        if let Some(v) = req.bedrooms {
            property.bedrooms = v;
        }
        if let Some(v) = req.bathrooms {
            property.bathrooms = v;
        }
        if let Some(v) = req.size_sqm {
            property.size_sqm = v;
        }
        if let Some(v) = &req.property_type {
            property.property_type = v.clone();
        }
        property.updated_at = Utc::now();
        Ok(property.clone())
    }

    async fn activate_property(&self, id: Uuid) -> ClientResult<Property> {
        self.set_status(id, PropertyStatus::Active).await
    }

    async fn deactivate_property(&self, id: Uuid) -> ClientResult<Property> {
        self.set_status(id, PropertyStatus::Inactive).await
    }

    async fn update_property_media(
        &self,
        id: Uuid,
        media: &PropertyMedia,
    ) -> ClientResult<Property> {
        let mut state = self.state.write().await;
        let property = state
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found("Property not found"))?;
        property.media = media.clone();
        property.updated_at = Utc::now();
        Ok(property.clone())
    }

    async fn get_property_traces(&self, id: Uuid) -> ClientResult<Vec<PropertyTrace>> {
        let state = self.state.read().await;
        Ok(state
            .traces
            .iter()
            .filter(|t| t.property_id == id)
            .cloned()
            .collect())
    }

    async fn advanced_search(&self, filter: &PropertyFilter) -> ClientResult<PropertyPage> {
        self.get_properties(filter).await
    }

    async fn get_property_stats(&self) -> ClientResult<PropertyStats> {
        let state = self.state.read().await;
        let mut stats = PropertyStats::default();
        for p in &state.properties {
            stats.total += 1;
            stats.total_value += p.price;
            match p.status {
                PropertyStatus::Active => stats.active += 1,
                PropertyStatus::Inactive => stats.inactive += 1,
                PropertyStatus::Sold => stats.sold += 1,
                PropertyStatus::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            stats.average_price = stats.total_value / stats.total as i64;
        }
        Ok(stats)
    }

    async fn get_agents(&self) -> ClientResult<Vec<Agent>> {
        Ok(self.state.read().await.agents.clone())
    }

    async fn get_agent_profile(&self, id: Uuid) -> ClientResult<Option<Agent>> {
        let state = self.state.read().await;
        Ok(state.agents.iter().find(|a| a.id == id).cloned())
    }

    async fn create_lead(&self, req: &CreateLeadRequest) -> ClientResult<Lead> {
        let lead = Lead {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            message: req.message.clone(),
            property_id: req.property_id,
            status: LeadStatus::New,
            created_at: Utc::now(),
        };
        self.state.write().await.leads.push(lead.clone());
        Ok(lead)
    }

    async fn get_leads(&self) -> ClientResult<Vec<Lead>> {
        Ok(self.state.read().await.leads.clone())
    }

    async fn get_notifications(&self) -> ClientResult<Vec<Notification>> {
        Ok(self.state.read().await.notifications.clone())
    }

    async fn mark_notification_read(&self, id: Uuid) -> ClientResult<()> {
        let mut state = self.state.write().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ClientError::not_found("Notification not found"))?;
        notification.is_read = true;
        Ok(())
    }

    async fn health_check(&self) -> ClientResult<HealthReport> {
        Ok(HealthReport {
            status: "ok".into(),
            mode: None,
        })
    }
}

/// Deterministic-enough demo dataset: three agents, a spread of listings
/// across cities and statuses, one traced sale.
fn seed() -> MockState {
    let now = Utc::now();

    let agents: Vec<Agent> = [
        ("Valentina Reyes", "valentina@million.example", 4.9_f32, 34_u32),
        ("Marcus Hale", "marcus@million.example", 4.7, 21),
        ("Sofia Lindqvist", "sofia@million.example", 4.8, 27),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, email, rating, sold))| Agent {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some(format!("+1 305 555 01{:02}", i)),
        role: "agent".into(),
        specialties: vec!["waterfront".into(), "penthouse".into()],
        bio: None,
        photo_url: None,
        stats: AgentStats {
            properties_sold: sold,
            rating,
        },
        created_at: now - Duration::days(400),
    })
    .collect();

    let cities = ["Miami", "Miami", "New York", "Los Angeles"];
    let statuses = [
        PropertyStatus::Active,
        PropertyStatus::Active,
        PropertyStatus::Active,
        PropertyStatus::Pending,
        PropertyStatus::Sold,
    ];

    let properties: Vec<Property> = (0..15)
        .map(|i| {
            let media_id = Uuid::new_v4();
            Property {
                id: Uuid::new_v4(),
                name: format!("Residence No. {}", i + 1),
                address: format!("{} Ocean Drive", 100 + i * 7),
                city: cities[i % cities.len()].to_string(),
                neighborhood: Some(if i % 2 == 0 { "Brickell" } else { "Edgewater" }.to_string()),
                price: 1_250_000 + (i as i64) * 480_000,
                bedrooms: 2 + (i as u32 % 4),
                bathrooms: 2 + (i as u32 % 3),
                size_sqm: 140.0 + (i as f64) * 22.5,
                property_type: if i % 3 == 0 { "Penthouse" } else { "Apartment" }.to_string(),
                status: statuses[i % statuses.len()],
                media: PropertyMedia {
                    cover_url: Some(format!("https://cdn.million.example/p{}/cover.jpg", i)),
                    gallery: vec![MediaItem {
                        id: media_id,
                        url: format!("https://cdn.million.example/p{}/1.jpg", i),
                        featured: true,
                        enabled: true,
                        position: 0,
                    }],
                },
                owner_id: agents[i % agents.len()].id,
                created_at: now - Duration::days(90 - i as i64),
                updated_at: now - Duration::days(10),
            }
        })
        .collect();

    let traced = &properties[4];
    let traces = vec![PropertyTrace {
        id: Uuid::new_v4(),
        property_id: traced.id,
        name: "Sold".into(),
        value: traced.price,
        tax: traced.price / 20,
        date_sale: now - Duration::days(12),
    }];

    let notifications = vec![Notification {
        id: Uuid::new_v4(),
        notification_type: NotificationType::LeadReceived,
        title: "New contact request".into(),
        message: Some(format!("A buyer asked about {}", properties[0].name)),
        is_read: false,
        created_at: now - Duration::hours(3),
    }];

    MockState {
        properties,
        agents,
        traces,
        leads: Vec::new(),
        notifications,
    }
}
