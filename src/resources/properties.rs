//! Paginated listings controller.
//!
//! Owns the listings slice of UI state: the accumulated page items, the
//! pagination cursor, and the loading/error flags. Failures never escape;
//! they land in the `error` field of the snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::property::{Property, PropertyFilter, PropertyPage};
use crate::error::ClientResult;
use crate::services::{DataService, ServiceResponse};

/// Point-in-time view of the listings state.
#[derive(Debug, Clone, Default)]
pub struct PropertiesSnapshot {
    pub properties: Vec<Property>,
    pub loading: bool,
    pub error: Option<String>,
    /// Advisory set when results came from the offline fallback.
    pub warning: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
}

pub struct PropertiesController {
    service: Arc<DataService>,
    filter: RwLock<PropertyFilter>,
    page_size: u32,
    state: RwLock<PropertiesSnapshot>,
    // Bumped on every replacing fetch; a stale response whose generation no
    // longer matches is discarded instead of overwriting newer state.
    generation: AtomicU64,
}

impl PropertiesController {
    pub fn new(service: Arc<DataService>, page_size: u32) -> Self {
        Self {
            service,
            filter: RwLock::new(PropertyFilter::default()),
            page_size: page_size.max(1),
            state: RwLock::new(PropertiesSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> PropertiesSnapshot {
        self.state.read().clone()
    }

    /// Replaces the filter and reloads from the first page.
    pub async fn set_filter(&self, filter: PropertyFilter) {
        *self.filter.write() = filter;
        self.refresh().await;
    }

    /// Fetches the first page, replacing the current list. Supersedes any
    /// fetch still in flight; the superseded response is discarded when it
    /// lands, so a post-mutation or filter-change reload is never dropped.
    pub async fn refresh(&self) {
        let generation = self.begin_replacing_load();
        let filter = self.filter.read().clone().with_page(1, self.page_size);

        let result = self.service.get_properties(&filter).await;
        self.finish(generation, result, false);
    }

    /// Appends the next page. A no-op while a fetch is in flight, before the
    /// first page has loaded, or once the last page is reached.
    pub async fn load_more(&self) {
        let next_page = {
            let state = self.state.read();
            if state.loading || state.current_page == 0 || state.current_page >= state.total_pages
            {
                return;
            }
            state.current_page + 1
        };
        if !self.begin_load() {
            return;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let filter = self.filter.read().clone().with_page(next_page, self.page_size);

        let result = self.service.get_properties(&filter).await;
        self.finish(generation, result, true);
    }

    /// Server-side search; replaces the list like a refresh, superseding
    /// whatever is in flight.
    pub async fn advanced_search(&self, filter: PropertyFilter) {
        *self.filter.write() = filter.clone();
        let generation = self.begin_replacing_load();
        let filter = filter.with_page(1, self.page_size);

        let result = self.service.advanced_search(&filter).await;
        self.finish(generation, result, false);
    }

    /// Activates the listing, then re-fetches the first page so the list
    /// shows the server's authoritative state. No optimistic patching.
    pub async fn activate_property(&self, id: Uuid) {
        self.mutate_status(id, true).await;
    }

    pub async fn deactivate_property(&self, id: Uuid) {
        self.mutate_status(id, false).await;
    }

    async fn mutate_status(&self, id: Uuid, activate: bool) {
        let result = if activate {
            self.service.activate_property(id).await
        } else {
            self.service.deactivate_property(id).await
        };

        match result {
            Ok(_) => self.refresh().await,
            Err(e) => self.state.write().error = Some(e.to_string()),
        }
    }

    fn begin_load(&self) -> bool {
        let mut state = self.state.write();
        if state.loading {
            return false;
        }
        state.loading = true;
        state.error = None;
        true
    }

    /// Marks a replacing fetch as in flight and claims a fresh generation.
    /// Unlike `begin_load` this never declines: the new fetch takes over
    /// the snapshot and the superseded one is discarded on arrival.
    fn begin_replacing_load(&self) -> u64 {
        let mut state = self.state.write();
        state.loading = true;
        state.error = None;
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn finish(
        &self,
        generation: u64,
        result: ClientResult<ServiceResponse<PropertyPage>>,
        append: bool,
    ) {
        let mut state = self.state.write();
        // A newer fetch owns the snapshot now, loading flag included.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding superseded listings response");
            return;
        }
        state.loading = false;
        match result {
            Ok(resp) => Self::apply_page(&mut state, resp.data, resp.warning, append),
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    fn apply_page(
        state: &mut PropertiesSnapshot,
        page: PropertyPage,
        warning: Option<String>,
        append: bool,
    ) {
        state.total = page.total;
        state.total_pages = page.total_pages();
        state.current_page = page.page;
        state.warning = warning;
        if append {
            state.properties.extend(page.items);
        } else {
            state.properties = page.items;
        }
    }
}
