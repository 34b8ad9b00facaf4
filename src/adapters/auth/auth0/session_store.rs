//! In-memory login session store.
//!
//! Plays the role the provider SDK's cache plays in a browser: it holds,
//! per browser session, either a login in progress or the tokens of an
//! established session. Only the Auth0 adapter writes to it.
//!
//! ```text
//! LoginPending --callback--> Exchanging --tokens--> Established
//!      |                          |                      |
//!      +------- timeout / failure / logout / re-login ----+--> removed
//! ```

use std::collections::HashMap;

use secrecy::SecretString;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AccessToken, AuthError, AuthState, AuthenticatedUser, SessionId, Timestamp,
};
use crate::domain::routing::ReturnTo;

use super::pkce::tokens_match;

/// A login waiting for its callback.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub state: String,
    pub nonce: String,
    pub code_verifier: String,
    pub return_to: ReturnTo,
    pub expires_at: Timestamp,
}

/// Tokens and user of a completed login.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub user: AuthenticatedUser,
    pub access_token: AccessToken,
    pub refresh_token: Option<SecretString>,
    pub expires_at: Timestamp,
}

#[derive(Debug)]
enum SessionEntry {
    LoginPending(PendingLogin),
    Exchanging { expires_at: Timestamp },
    Established(EstablishedSession),
}

impl SessionEntry {
    fn auth_state(&self) -> AuthState {
        match self {
            SessionEntry::LoginPending(_) => AuthState::Unauthenticated,
            SessionEntry::Exchanging { expires_at } if !expires_at.has_passed() => {
                AuthState::Loading
            }
            SessionEntry::Exchanging { .. } => AuthState::Unauthenticated,
            SessionEntry::Established(session) if !session.expires_at.has_passed() => {
                AuthState::Authenticated
            }
            SessionEntry::Established(_) => AuthState::Unauthenticated,
        }
    }

    fn is_expired(&self) -> bool {
        match self {
            SessionEntry::LoginPending(pending) => pending.expires_at.has_passed(),
            SessionEntry::Exchanging { expires_at } => expires_at.has_passed(),
            SessionEntry::Established(session) => session.expires_at.has_passed(),
        }
    }
}

/// Logins allowed to wait for their callback at the same time.
const MAX_PENDING_LOGINS: usize = 10_000;

#[derive(Debug)]
pub struct SessionStore {
    entries: RwLock<HashMap<SessionId, SessionEntry>>,
    max_pending: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_pending_limit(MAX_PENDING_LOGINS)
    }

    /// Store that keeps at most `max_pending` logins waiting; starting one
    /// more drops the pending login closest to its timeout.
    pub fn with_pending_limit(max_pending: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_pending: max_pending.max(1),
        }
    }

    pub async fn auth_state(&self, session: &SessionId) -> AuthState {
        self.entries
            .read()
            .await
            .get(session)
            .map(SessionEntry::auth_state)
            .unwrap_or(AuthState::Unauthenticated)
    }

    /// Records a started login, dropping expired entries on the way.
    pub async fn insert_pending(&self, session: SessionId, pending: PendingLogin) {
        let mut entries = self.entries.write().await;
        purge(&mut entries);

        let waiting: Vec<(SessionId, Timestamp)> = entries
            .iter()
            .filter_map(|(id, entry)| match entry {
                SessionEntry::LoginPending(p) => Some((*id, p.expires_at)),
                _ => None,
            })
            .collect();
        if waiting.len() >= self.max_pending {
            if let Some((oldest, _)) = waiting.iter().min_by_key(|(_, expires_at)| *expires_at) {
                entries.remove(oldest);
                tracing::warn!(session = %oldest, "Pending login limit reached, dropped oldest login");
            }
        }

        entries.insert(session, SessionEntry::LoginPending(pending));
    }

    /// Removes every expired entry; returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        purge(&mut *self.entries.write().await)
    }

    /// Claims the pending login for a callback and marks the session as
    /// exchanging until `exchange_deadline`.
    ///
    /// Anything else is reported as `InvalidState`. An expired login is
    /// removed; a live login with a different `state` stays pending, so a
    /// forged callback cannot cancel it.
    pub async fn begin_exchange(
        &self,
        session: &SessionId,
        state: &str,
        exchange_deadline: Timestamp,
    ) -> Result<PendingLogin, AuthError> {
        let mut entries = self.entries.write().await;
        match entries.remove(session) {
            Some(SessionEntry::LoginPending(pending))
                if !pending.expires_at.has_passed() && tokens_match(&pending.state, state) =>
            {
                entries.insert(
                    *session,
                    SessionEntry::Exchanging {
                        expires_at: exchange_deadline,
                    },
                );
                Ok(pending)
            }
            Some(SessionEntry::LoginPending(pending)) if pending.expires_at.has_passed() => {
                tracing::warn!(%session, "Login callback for an expired login");
                Err(AuthError::InvalidState)
            }
            Some(SessionEntry::LoginPending(pending)) => {
                tracing::warn!(%session, "Login callback with mismatched state");
                entries.insert(*session, SessionEntry::LoginPending(pending));
                Err(AuthError::InvalidState)
            }
            Some(other) => {
                // Not a login in progress; leave it as it was.
                entries.insert(*session, other);
                Err(AuthError::InvalidState)
            }
            None => Err(AuthError::InvalidState),
        }
    }

    /// Drops the pending login for `session` if `state` matches it.
    /// Returns whether a login was cancelled.
    pub async fn cancel_pending(&self, session: &SessionId, state: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(session) {
            Some(SessionEntry::LoginPending(pending)) if tokens_match(&pending.state, state) => {
                entries.remove(session);
                true
            }
            _ => false,
        }
    }

    pub async fn establish(&self, session: SessionId, established: EstablishedSession) {
        self.entries
            .write()
            .await
            .insert(session, SessionEntry::Established(established));
    }

    /// Snapshot of a live established session.
    pub async fn established(&self, session: &SessionId) -> Option<EstablishedSession> {
        match self.entries.read().await.get(session) {
            Some(SessionEntry::Established(s)) if !s.expires_at.has_passed() => Some(s.clone()),
            _ => None,
        }
    }

    /// Replaces the tokens of an established session after a refresh.
    /// A session that ended in the meantime stays ended.
    pub async fn update_tokens(
        &self,
        session: &SessionId,
        access_token: AccessToken,
        refresh_token: Option<SecretString>,
    ) {
        if let Some(SessionEntry::Established(s)) = self.entries.write().await.get_mut(session) {
            s.access_token = access_token;
            if refresh_token.is_some() {
                s.refresh_token = refresh_token;
            }
        }
    }

    /// Removes a session; returns whether it existed.
    pub async fn remove(&self, session: &SessionId) -> bool {
        self.entries.write().await.remove(session).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn purge(entries: &mut HashMap<SessionId, SessionEntry>) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired());
    let purged = before - entries.len();
    if purged > 0 {
        tracing::debug!(purged, "Purged expired login sessions");
    }
    purged
}
