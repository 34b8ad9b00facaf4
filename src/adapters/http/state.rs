//! Shared state of the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::auth::{
    CompleteSignInHandler, FetchAccessTokenHandler, SignInHandler, SignOutHandler,
};
use crate::ports::{IdentityProvider, LoginFlow};

use super::middleware::CookieSettings;

/// Handlers and provider access shared by every route.
#[derive(Clone)]
pub struct AppState {
    /// Read-only view of the provider session, used by the route guard.
    pub provider: Arc<dyn IdentityProvider>,
    pub sign_in: Arc<SignInHandler>,
    pub complete_sign_in: Arc<CompleteSignInHandler>,
    pub fetch_access_token: Arc<FetchAccessTokenHandler>,
    pub sign_out: Arc<SignOutHandler>,
    pub cookies: CookieSettings,
    /// Absolute URL the provider returns to after logout.
    pub logout_return_url: String,
}

impl AppState {
    /// Wires every handler to one provider implementing both identity ports.
    pub fn new<P>(
        provider: Arc<P>,
        cookies: CookieSettings,
        logout_return_url: impl Into<String>,
    ) -> Self
    where
        P: IdentityProvider + LoginFlow + 'static,
    {
        let identity: Arc<dyn IdentityProvider> = provider.clone();
        let login_flow: Arc<dyn LoginFlow> = provider;

        Self {
            provider: identity.clone(),
            sign_in: Arc::new(SignInHandler::new(login_flow.clone())),
            complete_sign_in: Arc::new(CompleteSignInHandler::new(login_flow)),
            fetch_access_token: Arc::new(FetchAccessTokenHandler::new(identity.clone())),
            sign_out: Arc::new(SignOutHandler::new(identity)),
            cookies,
            logout_return_url: logout_return_url.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cookies", &self.cookies)
            .field("logout_return_url", &self.logout_return_url)
            .finish_non_exhaustive()
    }
}
