//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `auth` - Identity provider implementations (Auth0, mock)
//! - `http` - axum routes, pages and the route guard middleware

pub mod auth;
pub mod http;
