//! Knowledge Base - Route-guarded web front for a document knowledge base
//!
//! The protected document overview is gated on the identity provider's
//! session state (`Loading` / `Authenticated` / `Unauthenticated`); Auth0
//! handles login, token issuance and logout.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
