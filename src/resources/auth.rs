//! Auth controller and app-wide context.
//!
//! The controller wraps the auth service with the `{ user, loading, error }`
//! state shape the UI consumes. `AuthContext` is the provider seam: consumers
//! receive it by injection, and reading an empty context fails loudly so a
//! missing provider is caught in development rather than silently defaulting
//! to logged-out.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::auth::AuthService;
use crate::domain::auth::AuthUser;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    pub user: Option<AuthUser>,
    pub authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct AuthController {
    auth: Arc<AuthService>,
    state: RwLock<AuthSnapshot>,
}

impl AuthController {
    pub fn new(auth: Arc<AuthService>) -> Self {
        let state = AuthSnapshot {
            user: auth.session().and_then(|s| s.user),
            authenticated: auth.is_authenticated(),
            ..Default::default()
        };
        Self {
            auth,
            state: RwLock::new(state),
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.read().clone()
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.auth
    }

    pub async fn login(&self, email: &str, password: &str) {
        {
            let mut state = self.state.write();
            if state.loading {
                return;
            }
            state.loading = true;
            state.error = None;
        }

        let result = self.auth.login(email, password).await;

        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(session) => {
                state.user = session.user;
                state.authenticated = true;
            }
            Err(e) => {
                state.user = None;
                state.authenticated = false;
                state.error = Some(e.to_string());
            }
        }
    }

    pub async fn logout(&self) {
        let result = self.auth.logout().await;

        let mut state = self.state.write();
        state.user = None;
        state.authenticated = false;
        if let Err(e) = result {
            state.error = Some(e.to_string());
        }
    }

    /// Refreshes the session; a failed refresh means forced logout and the
    /// state reflects that.
    pub async fn refresh_session(&self) {
        let result = self.auth.refresh_access_token().await;

        let mut state = self.state.write();
        match result {
            Ok(session) => {
                state.user = session.user;
                state.authenticated = true;
            }
            Err(e) => {
                state.user = None;
                state.authenticated = false;
                state.error = Some(e.to_string());
            }
        }
    }
}

/// Injectable handle to the auth controller. An empty context is a wiring
/// bug and reads fail with an explicit message instead of a silent default.
#[derive(Clone, Default)]
pub struct AuthContext {
    inner: Option<Arc<AuthController>>,
}

impl AuthContext {
    /// A context with no provider installed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn provide(controller: Arc<AuthController>) -> Self {
        Self {
            inner: Some(controller),
        }
    }

    pub fn controller(&self) -> ClientResult<Arc<AuthController>> {
        self.inner.clone().ok_or_else(|| {
            ClientError::Provider("AuthContext must be used within an AuthProvider".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStore;

    #[test]
    fn empty_context_fails_loudly() {
        let ctx = AuthContext::empty();
        let err = ctx.controller().err().unwrap();
        assert!(err.to_string().contains("must be used within an AuthProvider"));
    }

    #[test]
    fn provided_context_resolves() {
        let auth = Arc::new(
            AuthService::new(
                "http://localhost:5000/api",
                Arc::new(MemorySessionStore::new()),
                5,
                300,
            )
            .unwrap(),
        );
        let ctx = AuthContext::provide(Arc::new(AuthController::new(auth)));
        assert!(ctx.controller().is_ok());
    }
}
