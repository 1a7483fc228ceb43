//! Durable client-side state: session tokens and favorites.

mod favorites;
mod session;

pub use favorites::FavoritesStore;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
