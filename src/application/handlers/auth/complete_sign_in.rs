//! CompleteSignInHandler - Finishes a login from the provider callback.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, SessionId};
use crate::ports::{CompletedLogin, LoginCallback, LoginFlow};

/// Command carrying the provider callback for a browser session.
#[derive(Debug, Clone)]
pub struct CompleteSignInCommand {
    pub session_id: SessionId,
    pub callback: LoginCallback,
}

/// Handler for login callbacks.
pub struct CompleteSignInHandler {
    login_flow: Arc<dyn LoginFlow>,
}

impl CompleteSignInHandler {
    pub fn new(login_flow: Arc<dyn LoginFlow>) -> Self {
        Self { login_flow }
    }

    pub async fn handle(&self, cmd: CompleteSignInCommand) -> Result<CompletedLogin, AuthError> {
        match self
            .login_flow
            .complete_login(&cmd.session_id, cmd.callback)
            .await
        {
            Ok(completed) => {
                tracing::info!(
                    session = %cmd.session_id,
                    user = %completed.user.id,
                    "Login completed"
                );
                Ok(completed)
            }
            Err(e) => {
                tracing::warn!(session = %cmd.session_id, error = %e, "Login failed");
                Err(e)
            }
        }
    }
}
