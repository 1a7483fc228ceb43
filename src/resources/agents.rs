//! Agents controller: read-mostly roster of listing agents.

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::services::DataService;

#[derive(Debug, Clone, Default)]
pub struct AgentsSnapshot {
    pub agents: Vec<Agent>,
    pub loading: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub struct AgentsController {
    service: Arc<DataService>,
    state: RwLock<AgentsSnapshot>,
}

impl AgentsController {
    pub fn new(service: Arc<DataService>) -> Self {
        Self {
            service,
            state: RwLock::new(AgentsSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> AgentsSnapshot {
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

        let result = self.service.get_agents().await;

        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(resp) => {
                state.agents = resp.data;
                state.warning = resp.warning;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    /// Cheap lookup into the already-loaded roster.
    pub fn agent(&self, id: Uuid) -> Option<Agent> {
        self.state.read().agents.iter().find(|a| a.id == id).cloned()
    }
}
