//! SignOutHandler - Ends a session with the provider.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, SessionId};
use crate::ports::{IdentityProvider, LogoutRedirect};

/// Command to log a session out and return to `return_to` afterwards.
#[derive(Debug, Clone)]
pub struct SignOutCommand {
    pub session_id: SessionId,
    /// Absolute URL the provider sends the browser back to.
    pub return_to: String,
}

/// Handler for logouts.
pub struct SignOutHandler {
    provider: Arc<dyn IdentityProvider>,
}

impl SignOutHandler {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: SignOutCommand) -> Result<LogoutRedirect, AuthError> {
        let redirect = self
            .provider
            .logout(&cmd.session_id, &cmd.return_to)
            .await?;
        tracing::info!(session = %cmd.session_id, "Logged out");
        Ok(redirect)
    }
}
