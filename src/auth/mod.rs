//! Authentication: session lifecycle and token refresh.

mod service;

pub use service::AuthService;
