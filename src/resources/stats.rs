//! Dashboard stats controller.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::stats::PropertyStats;
use crate::services::DataService;

#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub stats: Option<PropertyStats>,
    pub loading: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub struct StatsController {
    service: Arc<DataService>,
    state: RwLock<StatsSnapshot>,
}

impl StatsController {
    pub fn new(service: Arc<DataService>) -> Self {
        Self {
            service,
            state: RwLock::new(StatsSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.state.read().clone()
    }

    pub async fn refresh(&self) {
        {
            let mut state = self.state.write();
            if state.loading {
                return;
            }
            state.loading = true;
            state.error = None;
        }

        let result = self.service.get_property_stats().await;

        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(resp) => {
                state.stats = Some(resp.data);
                state.warning = resp.warning;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }
}
