//! Middleware for the newsdesk API.

pub mod cors;

pub use cors::create_cors_layer;
