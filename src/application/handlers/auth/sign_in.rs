//! SignInHandler - Starts an interactive login.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, SessionId};
use crate::domain::routing::ReturnTo;
use crate::ports::{LoginFlow, LoginRedirect};

/// Command to start a login that lands on `return_to` afterwards.
#[derive(Debug, Clone, Default)]
pub struct SignInCommand {
    pub return_to: ReturnTo,
    /// Session the browser held before; it is replaced by the new login.
    pub replaces: Option<SessionId>,
}

/// Handler for starting logins.
pub struct SignInHandler {
    login_flow: Arc<dyn LoginFlow>,
}

impl SignInHandler {
    pub fn new(login_flow: Arc<dyn LoginFlow>) -> Self {
        Self { login_flow }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<LoginRedirect, AuthError> {
        if let Some(previous) = &cmd.replaces {
            self.login_flow.discard(previous).await;
        }
        let redirect = self.login_flow.begin_login(cmd.return_to.clone()).await?;
        tracing::info!(
            session = %redirect.session_id,
            return_to = %cmd.return_to,
            "Login started"
        );
        Ok(redirect)
    }
}
