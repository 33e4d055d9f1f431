//! API handlers for the newsdesk HTTP surface.

pub mod articles;
pub mod categories;
pub mod feeds;

pub use articles::*;
pub use categories::*;
pub use feeds::*;

use crate::db::Database;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
