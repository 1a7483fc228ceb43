//! Single-listing controller.
//!
//! Re-fetches when the selected id changes. Rapid id switches are the
//! classic stale-response race, so every load takes a generation ticket and
//! a response only lands if its ticket is still the latest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::property::Property;
use crate::domain::trace::PropertyTrace;
use crate::services::DataService;

#[derive(Debug, Clone, Default)]
pub struct PropertySnapshot {
    pub property_id: Option<Uuid>,
    /// `None` with a set id and no error means the listing does not exist.
    pub property: Option<Property>,
    pub loading: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub struct PropertyController {
    service: Arc<DataService>,
    state: RwLock<PropertySnapshot>,
    generation: AtomicU64,
}

impl PropertyController {
    pub fn new(service: Arc<DataService>) -> Self {
        Self {
            service,
            state: RwLock::new(PropertySnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> PropertySnapshot {
        self.state.read().clone()
    }

    /// Loads the listing with the given id. Unlike the list controller this
    /// is deliberately not gated on `loading`: a newer id supersedes an
    /// in-flight fetch, whose response is then discarded.
    pub async fn load(&self, id: Uuid) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            if state.property_id != Some(id) {
                state.property = None;
            }
            state.property_id = Some(id);
            state.loading = true;
            state.error = None;
        }

        let result = self.service.get_property_by_id(id).await;

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(property_id = %id, "Discarding stale property response");
            return;
        }
        state.loading = false;
        match result {
            // An absent listing is a valid result, not an error.
            Ok(resp) => {
                state.property = resp.data;
                state.warning = resp.warning;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    pub async fn refresh(&self) {
        let id = self.state.read().property_id;
        if let Some(id) = id {
            self.load(id).await;
        }
    }
}

/// Read-only timeline of a listing's historical events.
#[derive(Debug, Clone, Default)]
pub struct TracesSnapshot {
    pub traces: Vec<PropertyTrace>,
    pub loading: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub struct TracesController {
    service: Arc<DataService>,
    state: RwLock<TracesSnapshot>,
    generation: AtomicU64,
}

impl TracesController {
    pub fn new(service: Arc<DataService>) -> Self {
        Self {
            service,
            state: RwLock::new(TracesSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> TracesSnapshot {
        self.state.read().clone()
    }

    pub async fn load(&self, property_id: Uuid) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.service.get_property_traces(property_id).await;

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        state.loading = false;
        match result {
            Ok(resp) => {
                state.traces = resp.data;
                state.warning = resp.warning;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }
}
