//! HTTP adapter - pages, login endpoints and the route guard.

pub mod auth;
pub mod middleware;
pub mod pages;
mod router;
mod state;

pub use router::{app_router, build};
pub use state::AppState;
