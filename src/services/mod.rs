//! Data access services: live API client, mock backend, and the facade
//! that switches between them.

mod api;
mod backend;
mod data;
mod mock;

pub use api::ApiClient;
pub use backend::{Backend, HealthReport};
pub use data::{ConnectionStatus, DataService, ServiceResponse};
pub use mock::MockApi;
