//! Domain layer containing the route-gating logic and its vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, auth state, errors)
//! - `routing` - Path bindings and the pure route guard

pub mod foundation;
pub mod routing;
